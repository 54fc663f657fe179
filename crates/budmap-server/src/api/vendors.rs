//! Vendor search, lookup, check-in, analytics and navigation handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Extension, Json,
};
use budmap_core::{
    external_maps_url, render_route_map_html, Coordinates, DealType, MapsPlatform, Vendor,
    VendorSearchParams, VendorWithDistance,
};
use budmap_vendors::{CheckInReceipt, VendorAnalytics};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_service_error, normalize_max_results, ApiError, ApiResponse, AppState};

/// Search radius in miles when the request gives a location but no limit.
const DEFAULT_MAX_DISTANCE_MILES: f64 = 25.0;

// ---------------------------------------------------------------------------
// Request and response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct VendorSearchQuery {
    pub deal_type: Option<String>,
    pub max_distance: Option<f64>,
    pub max_results: Option<i64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LocationQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckInRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub(super) struct DirectionsData {
    vendor_id: String,
    vendor_name: String,
    origin: Coordinates,
    destination: Coordinates,
    distance_miles: f64,
    ios_url: String,
    android_url: String,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn parse_deal_type(req_id: &str, value: Option<&str>) -> Result<DealType, ApiError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "deal_type is required (birthday, daily, or special)",
        ));
    };
    value
        .parse()
        .map_err(|e: String| ApiError::new(req_id, "validation_error", e))
}

fn parse_max_distance(req_id: &str, value: Option<f64>) -> Result<f64, ApiError> {
    let distance = value.unwrap_or(DEFAULT_MAX_DISTANCE_MILES);
    if distance.is_finite() && distance >= 0.0 {
        Ok(distance)
    } else {
        Err(ApiError::new(
            req_id,
            "validation_error",
            format!("max_distance must be a non-negative number of miles, got {distance}"),
        ))
    }
}

/// `lat` and `lng` must be supplied together and lie within range.
fn parse_location(
    req_id: &str,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<Option<Coordinates>, ApiError> {
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                return Err(ApiError::new(
                    req_id,
                    "validation_error",
                    format!("coordinates out of range: lat={lat}, lng={lng}"),
                ));
            }
            Ok(Some(Coordinates::new(lat, lng)))
        }
        _ => Err(ApiError::new(
            req_id,
            "validation_error",
            "lat and lng must be provided together",
        )),
    }
}

fn require_location(req_id: &str, query: &LocationQuery) -> Result<Coordinates, ApiError> {
    parse_location(req_id, query.lat, query.lng)?.ok_or_else(|| {
        ApiError::new(req_id, "validation_error", "lat and lng are required")
    })
}

async fn resolve_vendor(state: &AppState, req_id: &str, id: &str) -> Result<Vendor, ApiError> {
    state
        .service
        .get_vendor_by_id(id)
        .await
        .map_err(|e| map_service_error(req_id.to_owned(), &e))?
        .ok_or_else(|| ApiError::new(req_id, "not_found", format!("vendor '{id}' not found")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/vendors: search vendors by deal type, optionally near a point.
pub(super) async fn search_vendors(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<VendorSearchQuery>,
) -> Result<Json<ApiResponse<Vec<VendorWithDistance>>>, ApiError> {
    let rid = &req_id.0;
    let params = VendorSearchParams {
        deal_type: parse_deal_type(rid, query.deal_type.as_deref())?,
        max_distance: parse_max_distance(rid, query.max_distance)?,
        max_results: normalize_max_results(query.max_results),
        current_location: parse_location(rid, query.lat, query.lng)?,
    };

    let results = state
        .service
        .search_vendors(&params)
        .await
        .map_err(|e| map_service_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, results)))
}

/// GET /api/v1/vendors/{id}
pub(super) async fn get_vendor(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vendor>>, ApiError> {
    let vendor = resolve_vendor(&state, &req_id.0, &id).await?;
    Ok(Json(ApiResponse::new(req_id.0, vendor)))
}

/// POST /api/v1/vendors/{id}/check-ins: record a user's visit.
pub(super) async fn check_in(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CheckInReceipt>>), ApiError> {
    let rid = &req_id.0;
    let user_id = body.user_id.trim();
    if user_id.is_empty() {
        return Err(ApiError::new(rid, "validation_error", "user_id must not be empty"));
    }

    let receipt = state
        .service
        .check_in_at_vendor(&id, user_id)
        .await
        .map_err(|e| map_service_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(req_id.0, receipt)),
    ))
}

/// GET /api/v1/vendors/{id}/analytics
pub(super) async fn get_analytics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Json<ApiResponse<VendorAnalytics>> {
    let analytics = state.service.get_vendor_analytics(&id);
    Json(ApiResponse::new(req_id.0, analytics))
}

/// GET /api/v1/vendors/{id}/directions: distance and native maps deep links.
pub(super) async fn get_directions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<ApiResponse<DirectionsData>>, ApiError> {
    let rid = &req_id.0;
    let origin = require_location(rid, &query)?;
    let vendor = resolve_vendor(&state, rid, &id).await?;
    let destination = vendor.location.coordinates;

    let data = DirectionsData {
        distance_miles: origin.distance_miles_to(&destination),
        ios_url: external_maps_url(MapsPlatform::Ios, &vendor.name, destination),
        android_url: external_maps_url(MapsPlatform::Android, &vendor.name, destination),
        vendor_id: vendor.id,
        vendor_name: vendor.name,
        origin,
        destination,
    };
    Ok(Json(ApiResponse::new(req_id.0, data)))
}

/// GET /api/v1/vendors/{id}/map: HTML page routing the user to the vendor.
pub(super) async fn get_route_map(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Query(query): Query<LocationQuery>,
) -> Result<Html<String>, ApiError> {
    let rid = &req_id.0;
    let Some(api_key) = state.maps_api_key.clone() else {
        return Err(ApiError::new(
            rid,
            "service_unavailable",
            "route maps are not configured",
        ));
    };
    let origin = require_location(rid, &query)?;
    let vendor = resolve_vendor(&state, rid, &id).await?;

    Ok(Html(render_route_map_html(origin, &vendor, &api_key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_deal_type_requires_known_value() {
        assert_eq!(
            parse_deal_type("r", Some("birthday")).ok(),
            Some(DealType::Birthday)
        );
        assert!(parse_deal_type("r", None).is_err());
        assert!(parse_deal_type("r", Some("  ")).is_err());
        assert!(parse_deal_type("r", Some("weekly")).is_err());
    }

    #[test]
    fn parse_max_distance_defaults_and_rejects_negative() {
        assert!((parse_max_distance("r", None).unwrap() - 25.0).abs() < f64::EPSILON);
        assert!((parse_max_distance("r", Some(0.0)).unwrap()).abs() < f64::EPSILON);
        assert!(parse_max_distance("r", Some(-1.0)).is_err());
        assert!(parse_max_distance("r", Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn parse_location_requires_pair_in_range() {
        assert!(parse_location("r", None, None).unwrap().is_none());
        assert_eq!(
            parse_location("r", Some(61.2), Some(-149.9)).unwrap(),
            Some(Coordinates::new(61.2, -149.9))
        );
        assert!(parse_location("r", Some(61.2), None).is_err());
        assert!(parse_location("r", None, Some(-149.9)).is_err());
        assert!(parse_location("r", Some(91.0), Some(0.0)).is_err());
        assert!(parse_location("r", Some(0.0), Some(-181.0)).is_err());
    }
}
