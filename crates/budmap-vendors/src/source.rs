//! Where vendor records come from.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use budmap_core::{load_vendors, parse_vendors, validate_vendors, Vendor, SEED_VENDORS_YAML};

use crate::error::SourceError;

/// Read access to a vendor catalog.
#[async_trait]
pub trait VendorSource: Send + Sync {
    /// Every vendor, as an independent copy the caller may modify.
    async fn fetch_all(&self) -> Result<Vec<Vendor>, SourceError>;

    /// The first vendor with `id`, or `None`.
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Vendor>, SourceError>;
}

/// Immutable in-memory catalog, validated on construction.
#[derive(Debug, Clone)]
pub struct VendorCatalog {
    vendors: Arc<[Vendor]>,
}

impl VendorCatalog {
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidCatalog`] if the vendors fail validation.
    pub fn new(vendors: Vec<Vendor>) -> Result<Self, SourceError> {
        validate_vendors(&vendors)?;
        Ok(Self {
            vendors: vendors.into(),
        })
    }

    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidCatalog`] if the embedded seed is malformed.
    pub fn seeded() -> Result<Self, SourceError> {
        let file = parse_vendors(SEED_VENDORS_YAML)?;
        Ok(Self {
            vendors: file.vendors.into(),
        })
    }

    /// # Errors
    ///
    /// Returns [`SourceError::InvalidCatalog`] if the file cannot be read,
    /// parsed, or validated.
    pub fn from_yaml_file(path: &Path) -> Result<Self, SourceError> {
        let file = load_vendors(path)?;
        Ok(Self {
            vendors: file.vendors.into(),
        })
    }

    #[must_use]
    pub fn vendors(&self) -> &[Vendor] {
        &self.vendors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

#[async_trait]
impl VendorSource for VendorCatalog {
    async fn fetch_all(&self) -> Result<Vec<Vendor>, SourceError> {
        Ok(self.vendors.to_vec())
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Vendor>, SourceError> {
        Ok(self.vendors.iter().find(|v| v.id == id).cloned())
    }
}
