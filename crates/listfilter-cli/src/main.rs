mod distance;
mod filter;
mod geocode;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use listfilter_core::{AppConfig, Environment};
use tracing_subscriber::EnvFilter;

use crate::filter::FilterCommands;

#[derive(Debug, Parser)]
#[command(name = "listfilter")]
#[command(about = "Filter and rank page items from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one filter over the items of a page file
    Filter {
        /// YAML page file with `items` and `controls`
        #[arg(long)]
        page: PathBuf,
        #[command(subcommand)]
        command: FilterCommands,
    },
    /// Resolve an address to coordinates
    Geocode {
        address: String,
        /// Overrides LISTFILTER_GEOCODE_API_KEY
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Geocode an address and rank the page's items by distance through its
    /// distance controls
    Distance {
        /// YAML page file with `items` and `controls`
        #[arg(long)]
        page: PathBuf,
        address: String,
        /// Overrides LISTFILTER_GEOCODE_API_KEY and per-control keys
        #[arg(long)]
        api_key: Option<String>,
    },
}

/// Colored, full-width log lines only while developing.
fn pretty_logs(env: &Environment) -> bool {
    matches!(env, Environment::Development)
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if pretty_logs(&config.env) {
        builder.init();
    } else {
        builder.compact().with_ansi(false).with_target(false).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = listfilter_core::load_app_config()?;
    init_tracing(&config)?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Filter { page, command } => filter::run_filter(&page, &command)?,
        Commands::Geocode { address, api_key } => {
            geocode::run_geocode(&config, &address, api_key.as_deref()).await?;
        }
        Commands::Distance {
            page,
            address,
            api_key,
        } => distance::run_distance(&config, &page, &address, api_key.as_deref()).await?,
    }

    Ok(())
}
