use std::sync::Arc;
use std::time::Duration;

use budmap_core::{AppConfig, Vendor, VendorSearchParams, VendorSourceConfig, VendorWithDistance};
use budmap_store::{checkin_key, FileStore, KeyValueStore, MemoryStore};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::VendorAnalytics;
use crate::clock::{Clock, SystemClock};
use crate::error::ServiceError;
use crate::http_source::HttpVendorSource;
use crate::search::run_search;
use crate::source::{VendorCatalog, VendorSource};

/// Artificial delays applied before catalog reads. Zero disables them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    pub search_latency: Duration,
    pub lookup_latency: Duration,
}

impl From<&AppConfig> for ServiceConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            search_latency: Duration::from_millis(config.search_latency_ms),
            lookup_latency: Duration::from_millis(config.lookup_latency_ms),
        }
    }
}

/// Result of a successful check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInReceipt {
    pub success: bool,
    /// The recorded check-in time, at millisecond precision.
    pub timestamp: DateTime<Utc>,
}

/// Vendor search, lookup, check-in and analytics over an injected catalog
/// source, check-in store and clock.
pub struct VendorSearchService {
    source: Arc<dyn VendorSource>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl VendorSearchService {
    pub fn new(
        source: Arc<dyn VendorSource>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            source,
            store,
            clock,
            config,
        }
    }

    /// Build the service with the catalog source and check-in store selected
    /// by `config`, on the system clock.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Source`] if the catalog cannot be loaded or the
    ///   remote source cannot be constructed.
    /// - [`ServiceError::Storage`] if the check-in file cannot be opened.
    pub async fn from_app_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let source: Arc<dyn VendorSource> = match &config.vendor_source {
            VendorSourceConfig::Seed => Arc::new(VendorCatalog::seeded()?),
            VendorSourceConfig::File(path) => Arc::new(VendorCatalog::from_yaml_file(path)?),
            VendorSourceConfig::Remote(url) => Arc::new(HttpVendorSource::new(
                url,
                config.source_request_timeout_secs,
                &config.source_user_agent,
            )?),
        };

        let store: Arc<dyn KeyValueStore> = match &config.checkin_store_path {
            Some(path) => Arc::new(FileStore::open(path.clone()).await?),
            None => Arc::new(MemoryStore::new()),
        };

        tracing::info!(
            vendor_source = ?config.vendor_source,
            checkin_store = ?config.checkin_store_path,
            "vendor service configured"
        );

        Ok(Self::new(
            source,
            store,
            Arc::new(SystemClock),
            ServiceConfig::from(config),
        ))
    }

    /// Vendors offering `params.deal_type`, ranked and truncated.
    ///
    /// With a `current_location`, results carry their distance and anything
    /// beyond `max_distance` is dropped. An empty list is a valid result.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Source`] if the catalog cannot be fetched.
    pub async fn search_vendors(
        &self,
        params: &VendorSearchParams,
    ) -> Result<Vec<VendorWithDistance>, ServiceError> {
        simulate_latency(self.config.search_latency).await;

        let vendors = self.source.fetch_all().await.map_err(|e| {
            tracing::error!(error = %e, deal_type = %params.deal_type, "vendor search failed");
            e
        })?;

        let today = self.clock.today();
        let results = run_search(vendors, params, today);
        tracing::debug!(
            deal_type = %params.deal_type,
            today = %today,
            located = params.current_location.is_some(),
            count = results.len(),
            "vendor search complete"
        );
        Ok(results)
    }

    /// # Errors
    ///
    /// Returns [`ServiceError::Source`] if the catalog cannot be read. An
    /// unknown id is `Ok(None)`.
    pub async fn get_vendor_by_id(&self, id: &str) -> Result<Option<Vendor>, ServiceError> {
        simulate_latency(self.config.lookup_latency).await;

        self.source.fetch_by_id(id).await.map_err(|e| {
            tracing::error!(error = %e, vendor_id = id, "vendor lookup failed");
            ServiceError::from(e)
        })
    }

    /// Record that `user_id` checked in at `vendor_id` now. A later check-in
    /// by the same user at the same vendor replaces this one.
    ///
    /// The vendor id is not checked against the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] if the store rejects the write.
    pub async fn check_in_at_vendor(
        &self,
        vendor_id: &str,
        user_id: &str,
    ) -> Result<CheckInReceipt, ServiceError> {
        let timestamp = self.clock.now().trunc_subsecs(3);
        let key = checkin_key(vendor_id, user_id);
        let value = timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);

        self.store.put(&key, &value).await.map_err(|e| {
            tracing::error!(error = %e, vendor_id, user_id, "check-in failed");
            e
        })?;

        tracing::info!(vendor_id, user_id, timestamp = %value, "check-in recorded");
        Ok(CheckInReceipt {
            success: true,
            timestamp,
        })
    }

    /// The latest check-in time for `user_id` at `vendor_id`, if any.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Storage`] if the store cannot be read.
    /// - [`ServiceError::Unexpected`] if the stored value is not RFC 3339.
    pub async fn last_check_in(
        &self,
        vendor_id: &str,
        user_id: &str,
    ) -> Result<Option<DateTime<Utc>>, ServiceError> {
        let key = checkin_key(vendor_id, user_id);
        let Some(value) = self.store.get(&key).await.map_err(|e| {
            tracing::error!(error = %e, key = %key, "check-in read failed");
            e
        })?
        else {
            return Ok(None);
        };

        DateTime::parse_from_rfc3339(&value)
            .map(|ts| Some(ts.with_timezone(&Utc)))
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    key = %key,
                    value = %value,
                    "stored check-in is not a timestamp"
                );
                ServiceError::Unexpected(format!(
                    "check-in {key} holds invalid timestamp '{value}': {e}"
                ))
            })
    }

    /// Engagement figures for a vendor. Currently the same for every id.
    #[must_use]
    pub fn get_vendor_analytics(&self, vendor_id: &str) -> VendorAnalytics {
        tracing::debug!(vendor_id, "serving placeholder analytics");
        VendorAnalytics::PLACEHOLDER
    }
}

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}
