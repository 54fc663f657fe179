use std::path::{Path, PathBuf};

use budmap_core::{AppConfig, Vendor, VendorSourceConfig};
use budmap_vendors::{HttpVendorSource, VendorCatalog, VendorSource};
use chrono::NaiveDate;
use clap::Subcommand;

/// Sub-commands available under `catalog`.
#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// Check a vendor catalog for errors
    Validate {
        /// YAML catalog file; defaults to the configured vendor source
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Load and validate a catalog, then print a per-vendor summary.
///
/// With `path`, that file is checked. Otherwise the configured source is:
/// the embedded seed, `BUDMAP_VENDORS_PATH`, or `BUDMAP_VENDORS_URL`.
///
/// # Errors
///
/// Returns an error describing the first problem found.
pub(crate) async fn run_catalog_validate(
    config: &AppConfig,
    path: Option<&Path>,
) -> anyhow::Result<()> {
    let (origin, vendors) = match (path, &config.vendor_source) {
        (Some(path), _) => (
            path.display().to_string(),
            VendorCatalog::from_yaml_file(path)?.vendors().to_vec(),
        ),
        (None, VendorSourceConfig::Seed) => (
            "embedded seed".to_string(),
            VendorCatalog::seeded()?.vendors().to_vec(),
        ),
        (None, VendorSourceConfig::File(path)) => (
            path.display().to_string(),
            VendorCatalog::from_yaml_file(path)?.vendors().to_vec(),
        ),
        (None, VendorSourceConfig::Remote(url)) => {
            let source = HttpVendorSource::new(
                url,
                config.source_request_timeout_secs,
                &config.source_user_agent,
            )?;
            (url.clone(), source.fetch_all().await?)
        }
    };

    let today = chrono::Local::now().date_naive();
    println!("{origin}: {} vendors OK", vendors.len());
    for vendor in &vendors {
        println!("  {}", summarize(vendor, today));
    }
    Ok(())
}

fn summarize(vendor: &Vendor, today: NaiveDate) -> String {
    let daily_days = budmap_core::DayOfWeek::ALL
        .iter()
        .filter(|day| !vendor.daily_deals(**day).is_empty())
        .count();
    format!(
        "{:<6}{:<28}birthday: {:<4}daily: {daily_days}/7  specials: {} ({} active)",
        vendor.id,
        vendor.name,
        if vendor.has_birthday_deal() { "yes" } else { "no" },
        vendor.deals.special.len(),
        vendor.active_special_deals(today).count()
    )
}
