use budmap_core::ConfigError;
use budmap_store::StoreError;
use thiserror::Error;

/// Errors from a [`crate::VendorSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid catalog base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid vendor catalog: {0}")]
    InvalidCatalog(#[from] ConfigError),

    #[error("requested vendor {requested} but {url} returned vendor {returned}")]
    VendorIdMismatch {
        requested: String,
        returned: String,
        url: String,
    },
}

/// Errors surfaced by [`crate::VendorSearchService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("vendor source failed: {0}")]
    Source(#[from] SourceError),

    #[error("check-in storage failed: {0}")]
    Storage(#[from] StoreError),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}
