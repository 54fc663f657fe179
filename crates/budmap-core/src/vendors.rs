//! Vendor record types shared by the catalog, the search service and the API.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All seven days, Monday first.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealType {
    Birthday,
    Daily,
    Special,
}

impl std::fmt::Display for DealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealType::Birthday => write!(f, "birthday"),
            DealType::Daily => write!(f, "daily"),
            DealType::Special => write!(f, "special"),
        }
    }
}

impl std::str::FromStr for DealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "birthday" => Ok(DealType::Birthday),
            "daily" => Ok(DealType::Daily),
            "special" => Ok(DealType::Special),
            other => Err(format!(
                "unknown deal type '{other}'; expected birthday, daily, or special"
            )),
        }
    }
}

/// One value per day of the week.
///
/// Every day is a required field, so a catalog entry cannot omit a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekMap<T> {
    pub monday: T,
    pub tuesday: T,
    pub wednesday: T,
    pub thursday: T,
    pub friday: T,
    pub saturday: T,
    pub sunday: T,
}

impl<T> WeekMap<T> {
    #[must_use]
    pub fn get(&self, day: DayOfWeek) -> &T {
        match day {
            DayOfWeek::Monday => &self.monday,
            DayOfWeek::Tuesday => &self.tuesday,
            DayOfWeek::Wednesday => &self.wednesday,
            DayOfWeek::Thursday => &self.thursday,
            DayOfWeek::Friday => &self.friday,
            DayOfWeek::Saturday => &self.saturday,
            DayOfWeek::Sunday => &self.sunday,
        }
    }

    /// Iterate `(day, value)` pairs, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (DayOfWeek, &T)> {
        DayOfWeek::ALL.into_iter().map(move |day| (day, self.get(day)))
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in miles.
    #[must_use]
    pub fn distance_miles_to(&self, other: &Coordinates) -> f64 {
        crate::geo::distance_miles(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorLocation {
    pub address: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialHandles {
    pub instagram: String,
    pub facebook: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorContact {
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub social: SocialHandles,
}

/// Opening and closing time, `"HH:MM"` 24-hour local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub open: String,
    pub close: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub description: String,
    pub discount: String,
    #[serde(default)]
    pub restrictions: Vec<String>,
}

/// A deal that runs between two calendar dates, inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialDeal {
    pub title: String,
    pub description: String,
    pub discount: String,
    #[serde(default)]
    pub restrictions: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SpecialDeal {
    #[must_use]
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorDeals {
    #[serde(default)]
    pub birthday: Option<Deal>,
    pub daily: WeekMap<Vec<Deal>>,
    #[serde(default)]
    pub special: Vec<SpecialDeal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub location: VendorLocation,
    pub contact: VendorContact,
    pub hours: WeekMap<BusinessHours>,
    pub deals: VendorDeals,
    #[serde(default)]
    pub is_partner: bool,
    pub rating: f64,
    pub last_updated: DateTime<Utc>,
}

impl Vendor {
    /// `true` when the vendor offers a birthday deal with a discount.
    #[must_use]
    pub fn has_birthday_deal(&self) -> bool {
        self.deals
            .birthday
            .as_ref()
            .is_some_and(|deal| !deal.discount.is_empty())
    }

    #[must_use]
    pub fn daily_deals(&self, day: DayOfWeek) -> &[Deal] {
        self.deals.daily.get(day)
    }

    /// Special deals running on `date`.
    pub fn active_special_deals(&self, date: NaiveDate) -> impl Iterator<Item = &SpecialDeal> {
        self.deals
            .special
            .iter()
            .filter(move |deal| deal.is_active_on(date))
    }
}

/// A vendor plus its distance from the searcher, when a location was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorWithDistance {
    #[serde(flatten)]
    pub vendor: Vendor,
    /// Miles from the search location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl From<Vendor> for VendorWithDistance {
    fn from(vendor: Vendor) -> Self {
        Self {
            vendor,
            distance: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorSearchParams {
    pub deal_type: DealType,
    /// Distance ceiling in miles; only applied with `current_location`.
    pub max_distance: f64,
    pub max_results: usize,
    #[serde(default)]
    pub current_location: Option<Coordinates>,
}
