use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use townbeat_collector::{
    sync_to_storage, Collector, CollectorConfig, HttpFetcher, MemoryEventStore, SourceRegistry,
};
use townbeat_common::Config;
use townbeat_discovery::DiscoveryEngine;

#[derive(Parser)]
#[command(name = "townbeat", about = "Discover and collect local event feeds")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Probe candidate domains for a city and list discovered feeds
    Discover {
        /// City name, e.g. "Duluth"
        city: String,
        /// State or region name, e.g. "Minnesota" or "MN"
        region: String,
    },
    /// Collect events from the default seed sources and print them
    Collect,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("townbeat=info".parse()?))
        .init();

    let config = Config::from_env();
    let fetcher = HttpFetcher::new(&config)?;
    let cli = Cli::parse();

    match cli.command {
        Command::Discover { city, region } => {
            info!(city = city.as_str(), region = region.as_str(), "Starting discovery");
            let engine = DiscoveryEngine::new(&fetcher);
            let feeds = engine.discover_popular(&city, &region).await;

            println!("{}", serde_json::to_string_pretty(&feeds)?);
            info!(feeds = feeds.len(), "Discovery finished");
        }
        Command::Collect => {
            info!("Starting collection run");
            let mut registry = SourceRegistry::with_default_seeds();
            let collector = Collector::new(&fetcher, CollectorConfig::from(&config));
            let events = collector.collect_all(&mut registry).await;

            let store = MemoryEventStore::new();
            let stored = sync_to_storage(&store, &events).await;

            println!("{}", serde_json::to_string_pretty(&store.events().await)?);
            info!(stored, "Collection finished");
        }
    }

    Ok(())
}
