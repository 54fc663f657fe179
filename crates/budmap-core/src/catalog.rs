use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::vendors::Vendor;
use crate::ConfigError;

/// Seed catalog compiled into the binary.
pub const SEED_VENDORS_YAML: &str = include_str!("../../../config/vendors.yaml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorsFile {
    pub vendors: Vec<Vendor>,
}

/// Load and validate a vendor catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_vendors(path: &Path) -> Result<VendorsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::VendorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_vendors(&content)
}

/// Parse and validate a vendor catalog from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text is not a valid catalog.
pub fn parse_vendors(content: &str) -> Result<VendorsFile, ConfigError> {
    let vendors_file: VendorsFile = serde_yaml::from_str(content)?;
    validate_vendors(&vendors_file.vendors)?;
    Ok(vendors_file)
}

/// Check the invariants every catalog must hold, whatever its origin.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] naming the first offending vendor.
pub fn validate_vendors(vendors: &[Vendor]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for vendor in vendors {
        if vendor.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "vendor '{}' has an empty id",
                vendor.name
            )));
        }

        if vendor.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "vendor '{}' has an empty name",
                vendor.id
            )));
        }

        if !seen_ids.insert(vendor.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate vendor id: '{}'",
                vendor.id
            )));
        }

        if !vendor.rating.is_finite() || !(0.0..=5.0).contains(&vendor.rating) {
            return Err(ConfigError::Validation(format!(
                "vendor '{}' has invalid rating {}; must be between 0 and 5",
                vendor.id, vendor.rating
            )));
        }

        let coords = vendor.location.coordinates;
        if !(-90.0..=90.0).contains(&coords.latitude)
            || !(-180.0..=180.0).contains(&coords.longitude)
        {
            return Err(ConfigError::Validation(format!(
                "vendor '{}' has out-of-range coordinates ({}, {})",
                vendor.id, coords.latitude, coords.longitude
            )));
        }

        for (day, hours) in vendor.hours.iter() {
            for time in [&hours.open, &hours.close] {
                if NaiveTime::parse_from_str(time, "%H:%M").is_err() {
                    return Err(ConfigError::Validation(format!(
                        "vendor '{}' has invalid {day} hours '{time}'; expected HH:MM",
                        vendor.id
                    )));
                }
            }
        }

        for special in &vendor.deals.special {
            if special.start_date > special.end_date {
                return Err(ConfigError::Validation(format!(
                    "vendor '{}' special '{}' ends before it starts",
                    vendor.id, special.title
                )));
            }
        }
    }

    Ok(())
}
