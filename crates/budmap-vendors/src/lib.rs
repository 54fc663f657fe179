//! Vendor discovery for budmap.
//!
//! [`VendorSearchService`] ties together a [`VendorSource`] (embedded seed,
//! YAML file, or remote HTTP catalog), a check-in
//! [`budmap_store::KeyValueStore`], and a [`Clock`].

pub mod analytics;
pub mod clock;
pub mod error;
pub mod http_source;
pub mod search;
pub mod service;
pub mod source;

pub use analytics::VendorAnalytics;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ServiceError, SourceError};
pub use http_source::HttpVendorSource;
pub use search::{compare_results, matches_deal_type, run_search};
pub use service::{CheckInReceipt, ServiceConfig, VendorSearchService};
pub use source::{VendorCatalog, VendorSource};
