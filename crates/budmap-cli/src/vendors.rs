//! Vendor command handlers: search, show, directions, route map, check-in and
//! analytics. Each handler builds a [`VendorSearchService`] from the
//! environment configuration and prints to stdout.

use budmap_core::{
    external_maps_url, render_route_map_html, AppConfig, Coordinates, DealType, MapsPlatform,
    Vendor, VendorSearchParams,
};
use budmap_vendors::VendorSearchService;
use chrono::SecondsFormat;
use clap::Subcommand;

/// Sub-commands available under `vendors`.
#[derive(Debug, Subcommand)]
pub enum VendorsCommands {
    /// Search vendors by deal type
    Search {
        /// birthday, daily, or special
        #[arg(long)]
        deal_type: DealType,
        /// Distance ceiling in miles (applies with --lat/--lng)
        #[arg(long, default_value_t = 25.0)]
        max_distance: f64,
        /// Maximum number of vendors to show
        #[arg(long, default_value_t = 20)]
        max_results: usize,
        /// Your latitude
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Your longitude
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },
    /// Show one vendor as JSON
    Show {
        /// Vendor ID
        id: String,
    },
    /// Distance and maps app links to a vendor
    Directions {
        /// Vendor ID
        id: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Only print the link for this platform (ios or android)
        #[arg(long)]
        platform: Option<MapsPlatform>,
    },
    /// Print the route map HTML page for a vendor
    Map {
        /// Vendor ID
        id: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
}

pub(crate) async fn run(config: &AppConfig, command: VendorsCommands) -> anyhow::Result<()> {
    match command {
        VendorsCommands::Search {
            deal_type,
            max_distance,
            max_results,
            lat,
            lng,
        } => {
            let params = VendorSearchParams {
                deal_type,
                max_distance,
                max_results,
                current_location: lat.zip(lng).map(|(lat, lng)| Coordinates::new(lat, lng)),
            };
            run_vendors_search(config, &params).await
        }
        VendorsCommands::Show { id } => run_vendors_show(config, &id).await,
        VendorsCommands::Directions {
            id,
            lat,
            lng,
            platform,
        } => run_vendors_directions(config, &id, Coordinates::new(lat, lng), platform).await,
        VendorsCommands::Map { id, lat, lng } => {
            run_vendors_map(config, &id, Coordinates::new(lat, lng)).await
        }
    }
}

async fn find_vendor(service: &VendorSearchService, id: &str) -> anyhow::Result<Vendor> {
    service
        .get_vendor_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("vendor '{id}' not found"))
}

fn fmt_distance(distance: Option<f64>) -> String {
    distance.map_or_else(|| "\u{2014}".to_string(), |d| format!("{d:.1} mi"))
}

/// Search vendors and print a ranked table.
///
/// # Errors
///
/// Returns an error if the service cannot be built or the catalog cannot be
/// read.
pub(crate) async fn run_vendors_search(
    config: &AppConfig,
    params: &VendorSearchParams,
) -> anyhow::Result<()> {
    let service = VendorSearchService::from_app_config(config).await?;
    let results = service.search_vendors(params).await?;

    if results.is_empty() {
        println!("no vendors found with {} deals", params.deal_type);
        return Ok(());
    }

    println!("{:<6}{:<28}{:<8}{:<10}PARTNER", "ID", "NAME", "RATING", "DISTANCE");
    for result in &results {
        let vendor = &result.vendor;
        println!(
            "{:<6}{:<28}{:<8.1}{:<10}{}",
            vendor.id,
            vendor.name,
            vendor.rating,
            fmt_distance(result.distance),
            if vendor.is_partner { "yes" } else { "" }
        );
    }

    Ok(())
}

/// # Errors
///
/// Returns an error if the vendor does not exist or the catalog cannot be
/// read.
pub(crate) async fn run_vendors_show(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let service = VendorSearchService::from_app_config(config).await?;
    let vendor = find_vendor(&service, id).await?;
    println!("{}", serde_json::to_string_pretty(&vendor)?);
    Ok(())
}

/// # Errors
///
/// Returns an error if the vendor does not exist or the catalog cannot be
/// read.
pub(crate) async fn run_vendors_directions(
    config: &AppConfig,
    id: &str,
    origin: Coordinates,
    platform: Option<MapsPlatform>,
) -> anyhow::Result<()> {
    let service = VendorSearchService::from_app_config(config).await?;
    let vendor = find_vendor(&service, id).await?;
    let destination = vendor.location.coordinates;

    println!("{} \u{2014} {}", vendor.name, vendor.location.address);
    println!("Distance: {:.1} mi", origin.distance_miles_to(&destination));

    let platforms = match platform {
        Some(platform) => vec![platform],
        None => vec![MapsPlatform::Ios, MapsPlatform::Android],
    };
    for platform in platforms {
        let label = match platform {
            MapsPlatform::Ios => "iOS",
            MapsPlatform::Android => "Android",
        };
        println!(
            "{label}: {}",
            external_maps_url(platform, &vendor.name, destination)
        );
    }

    Ok(())
}

/// # Errors
///
/// Returns an error if `BUDMAP_MAPS_API_KEY` is unset, the vendor does not
/// exist, or the catalog cannot be read.
pub(crate) async fn run_vendors_map(
    config: &AppConfig,
    id: &str,
    origin: Coordinates,
) -> anyhow::Result<()> {
    let api_key = config
        .maps_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("BUDMAP_MAPS_API_KEY is required to render route maps"))?;

    let service = VendorSearchService::from_app_config(config).await?;
    let vendor = find_vendor(&service, id).await?;
    println!("{}", render_route_map_html(origin, &vendor, api_key));
    Ok(())
}

/// Record a check-in. With the default in-memory store the check-in only
/// lives for this process; set `BUDMAP_CHECKIN_STORE_PATH` to keep it.
///
/// # Errors
///
/// Returns an error if the check-in store cannot be opened or written.
pub(crate) async fn run_check_in(
    config: &AppConfig,
    vendor_id: &str,
    user_id: &str,
) -> anyhow::Result<()> {
    if user_id.trim().is_empty() {
        anyhow::bail!("--user must not be empty");
    }
    if config.checkin_store_path.is_none() {
        tracing::warn!("BUDMAP_CHECKIN_STORE_PATH not set; check-in will not be persisted");
    }

    let service = VendorSearchService::from_app_config(config).await?;
    let receipt = service.check_in_at_vendor(vendor_id, user_id).await?;
    println!(
        "checked in {user_id} at vendor {vendor_id} at {}",
        receipt.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    Ok(())
}

/// # Errors
///
/// Returns an error if the service cannot be built.
pub(crate) async fn run_analytics(config: &AppConfig, vendor_id: &str) -> anyhow::Result<()> {
    let service = VendorSearchService::from_app_config(config).await?;
    let analytics = service.get_vendor_analytics(vendor_id);

    println!("Vendor {vendor_id}");
    println!("{:<18}{}", "check-ins", analytics.check_ins);
    println!("{:<18}{}", "social posts", analytics.social_posts);
    println!("{:<18}{}", "route visits", analytics.route_visits);
    println!("{:<18}{}", "unique visitors", analytics.unique_visitors);
    println!("{:<18}{}", "repeat visitors", analytics.repeat_visitors);
    Ok(())
}
