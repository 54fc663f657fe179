mod catalog;
mod vendors;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::catalog::CatalogCommands;
use crate::vendors::VendorsCommands;

#[derive(Debug, Parser)]
#[command(name = "budmap-cli")]
#[command(about = "Find dispensary deals near you")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search and inspect vendors
    Vendors {
        #[command(subcommand)]
        command: VendorsCommands,
    },
    /// Record a check-in at a vendor
    CheckIn {
        /// Vendor ID
        #[arg(long)]
        vendor: String,
        /// User ID
        #[arg(long)]
        user: String,
    },
    /// Show engagement figures for a vendor
    Analytics {
        /// Vendor ID
        id: String,
    },
    /// Vendor catalog maintenance
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = budmap_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("budmap-cli: run with --help to list commands");
        return Ok(());
    };

    match command {
        Commands::Vendors { command } => vendors::run(&config, command).await,
        Commands::CheckIn { vendor, user } => vendors::run_check_in(&config, &vendor, &user).await,
        Commands::Analytics { id } => vendors::run_analytics(&config, &id).await,
        Commands::Catalog { command } => match command {
            CatalogCommands::Validate { path } => {
                catalog::run_catalog_validate(&config, path.as_deref()).await
            }
        },
    }
}
