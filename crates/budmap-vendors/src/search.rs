//! Vendor search pipeline: deal filter, distance filter, ranking, truncation.
//!
//! Everything here is pure; [`crate::VendorSearchService`] supplies the
//! catalog snapshot and the current weekday.

use std::cmp::Ordering;

use budmap_core::{DayOfWeek, DealType, Vendor, VendorSearchParams, VendorWithDistance};

/// Whether `vendor` qualifies for a search by `deal_type` on `today`.
///
/// `Special` matches every vendor; special-deal date windows are not
/// consulted when searching.
#[must_use]
pub fn matches_deal_type(vendor: &Vendor, deal_type: DealType, today: DayOfWeek) -> bool {
    match deal_type {
        DealType::Birthday => vendor.has_birthday_deal(),
        DealType::Daily => !vendor.daily_deals(today).is_empty(),
        DealType::Special => true,
    }
}

/// Result ordering.
///
/// Results with a distance come first, nearest first. Results without one
/// follow, highest rated first. Ties on distance also go to the higher rating.
/// Total over all inputs, NaN included.
#[must_use]
pub fn compare_results(a: &VendorWithDistance, b: &VendorWithDistance) -> Ordering {
    let by_rating = || b.vendor.rating.total_cmp(&a.vendor.rating);
    match (a.distance, b.distance) {
        (Some(da), Some(db)) => da.total_cmp(&db).then_with(by_rating),
        (None, None) => by_rating(),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
    }
}

/// Run a search over `vendors`, which the caller owns.
#[must_use]
pub fn run_search(
    vendors: Vec<Vendor>,
    params: &VendorSearchParams,
    today: DayOfWeek,
) -> Vec<VendorWithDistance> {
    let matching = vendors
        .into_iter()
        .filter(|vendor| matches_deal_type(vendor, params.deal_type, today));

    let mut results: Vec<VendorWithDistance> = match params.current_location {
        Some(origin) => matching
            .filter_map(|vendor| {
                let distance = origin.distance_miles_to(&vendor.location.coordinates);
                // NaN compares false and is dropped here.
                (distance <= params.max_distance).then_some(VendorWithDistance {
                    vendor,
                    distance: Some(distance),
                })
            })
            .collect(),
        None => matching.map(VendorWithDistance::from).collect(),
    };

    results.sort_by(compare_results);
    results.truncate(params.max_results);
    results
}
