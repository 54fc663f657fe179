//! Shared domain types and configuration for budmap.
//!
//! Vendor records and search parameters, the haversine distance, catalog file
//! loading and validation, navigation helpers, and environment configuration.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geo;
pub mod navigation;
pub mod vendors;

pub use app_config::{AppConfig, Environment, VendorSourceConfig};
pub use catalog::{load_vendors, parse_vendors, validate_vendors, VendorsFile, SEED_VENDORS_YAML};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use geo::distance_miles;
pub use navigation::{external_maps_url, midpoint, render_route_map_html, MapsPlatform};
pub use vendors::{
    BusinessHours, Coordinates, DayOfWeek, Deal, DealType, SocialHandles, SpecialDeal, Vendor,
    VendorContact, VendorDeals, VendorLocation, VendorSearchParams, VendorWithDistance, WeekMap,
};
