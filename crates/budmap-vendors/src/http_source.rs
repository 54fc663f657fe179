use std::time::Duration;

use async_trait::async_trait;
use budmap_core::{validate_vendors, Vendor, VendorsFile};
use reqwest::{Client, StatusCode, Url};

use crate::error::SourceError;
use crate::source::VendorSource;

/// Vendor catalog served by a remote catalog service.
///
/// Expects `GET {base}/vendors` to return `{"vendors": [...]}` and
/// `GET {base}/vendors/{id}` to return a single vendor or 404. Failures are
/// returned as-is; retry policy belongs to the caller.
pub struct HttpVendorSource {
    client: Client,
    base_url: Url,
}

impl HttpVendorSource {
    /// # Errors
    ///
    /// - [`SourceError::InvalidBaseUrl`] if `base_url` is not an absolute
    ///   http(s) URL.
    /// - [`SourceError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        let invalid = |reason: String| SourceError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(invalid("expected an http or https URL".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejected cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<Option<T>, SourceError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| SourceError::Deserialize {
                context: context.to_string(),
                source: e,
            })
    }
}

#[async_trait]
impl VendorSource for HttpVendorSource {
    async fn fetch_all(&self) -> Result<Vec<Vendor>, SourceError> {
        let url = self.endpoint(&["vendors"]);

        // The list endpoint always exists; 404 means a misconfigured base URL.
        let file: VendorsFile = self
            .get_json(url.clone(), "vendor list")
            .await?
            .ok_or_else(|| SourceError::UnexpectedStatus {
                status: StatusCode::NOT_FOUND.as_u16(),
                url: url.to_string(),
            })?;

        validate_vendors(&file.vendors)?;
        tracing::debug!(count = file.vendors.len(), url = %url, "fetched remote vendor catalog");
        Ok(file.vendors)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Vendor>, SourceError> {
        let url = self.endpoint(&["vendors", id]);
        let vendor: Option<Vendor> = self.get_json(url.clone(), &format!("vendor {id}")).await?;

        if let Some(vendor) = &vendor {
            if vendor.id != id {
                tracing::warn!(
                    requested = id,
                    returned = %vendor.id,
                    %url,
                    "catalog returned wrong vendor"
                );
                return Err(SourceError::VendorIdMismatch {
                    requested: id.to_owned(),
                    returned: vendor.id.clone(),
                    url: url.to_string(),
                });
            }
            validate_vendors(std::slice::from_ref(vendor))?;
        }
        Ok(vendor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let source = HttpVendorSource::new("https://catalog.example.com/api/", 5, "test").unwrap();
        assert_eq!(
            source.endpoint(&["vendors"]).as_str(),
            "https://catalog.example.com/api/vendors"
        );
    }

    #[test]
    fn endpoint_percent_encodes_id() {
        let source = HttpVendorSource::new("https://catalog.example.com", 5, "test").unwrap();
        assert_eq!(
            source.endpoint(&["vendors", "green dreams/1"]).as_str(),
            "https://catalog.example.com/vendors/green%20dreams%2F1"
        );
    }

    #[test]
    fn new_rejects_non_http_url() {
        let result = HttpVendorSource::new("file:///etc/vendors", 5, "test");
        assert!(matches!(result, Err(SourceError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn new_rejects_relative_url() {
        let result = HttpVendorSource::new("catalog/vendors", 5, "test");
        assert!(matches!(result, Err(SourceError::InvalidBaseUrl { .. })));
    }
}
