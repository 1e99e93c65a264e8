#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! pulse-map: live per-district activity overlay engine.
//!
//! Fetches crowd and commercial-activity metrics for every catalog area
//! on a fixed cadence, merges them with the static geometry, and keeps a
//! renderer's overlay source in sync with the latest snapshot. Runs
//! headless here; a real tile engine plugs in through the
//! `MapRenderer` trait.

mod headless;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use pulse_map_aggregate::{Scheduler, SnapshotFeed, run_cycle};
use pulse_map_catalog::AreaCatalog;
use pulse_map_overlay::{MapRenderer, OverlaySync, merge};
use pulse_map_source::{AreaFetcher, CityDataClient, citydata::DEFAULT_BASE_URL};
use pulse_map_view::search;

use crate::headless::HeadlessRenderer;

/// Live district activity overlay engine for the Seoul citydata
/// endpoints.
#[derive(Debug, Parser)]
#[command(name = "pulse-map", version)]
struct Args {
    /// Area catalog GeoJSON file; defaults to the embedded Seoul catalog.
    #[arg(long)]
    areas: Option<PathBuf>,

    /// API key for the crowd population dataset (citydata_ppltn).
    #[arg(long, env = "SEOUL_PPLTN_KEY")]
    population_key: Option<String>,

    /// API key for the commercial activity dataset (citydata_cmrcl).
    #[arg(long, env = "SEOUL_CMRCL_KEY")]
    commercial_key: Option<String>,

    /// Endpoint base URL.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Minutes between aggregation cycles.
    #[arg(long, default_value_t = 30)]
    interval_mins: u64,

    /// Run one cycle, print a summary, and exit.
    #[arg(long)]
    once: bool,

    /// Resolve an area name and log the camera move it would produce.
    #[arg(long, value_name = "AREA")]
    fly_to: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let args = Args::parse();

    let catalog = match &args.areas {
        Some(path) => AreaCatalog::from_path(path)?,
        None => AreaCatalog::embedded()?,
    };
    log::info!("Loaded catalog with {} areas", catalog.len());

    let mut renderer = HeadlessRenderer::default();

    if let Some(query) = &args.fly_to {
        match search(&catalog, query) {
            Ok(command) => renderer.fly_to(command.center, command.zoom),
            Err(error) => log::error!("Search failed: {error}"),
        }
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let client = CityDataClient::new(
        http,
        args.base_url.clone(),
        args.population_key.clone(),
        args.commercial_key.clone(),
    )?;

    if args.once {
        return run_once(&client, &catalog, &mut renderer).await;
    }

    run_forever(client, catalog, renderer, args.interval_mins).await;
    Ok(())
}

/// Runs a single aggregation cycle, syncs the result once, and reports.
async fn run_once(
    client: &CityDataClient,
    catalog: &AreaCatalog,
    renderer: &mut HeadlessRenderer,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = run_cycle(client, catalog).await;
    let collection = merge(catalog, &outcome.snapshot);
    OverlaySync::default().sync(renderer, &collection)?;

    println!(
        "{} of {} areas reported; overlay carries {} features",
        outcome.succeeded(),
        catalog.len(),
        collection.features.len(),
    );
    for failure in &outcome.failures {
        println!("  failed: {} ({})", failure.area, failure.error);
    }
    Ok(())
}

async fn run_forever(
    client: CityDataClient,
    catalog: AreaCatalog,
    mut renderer: HeadlessRenderer,
    interval_mins: u64,
) {
    let catalog = Arc::new(catalog);
    let feed = Arc::new(SnapshotFeed::new());
    let scheduler = Scheduler::spawn(
        Arc::new(client) as Arc<dyn AreaFetcher>,
        Arc::clone(&catalog),
        Duration::from_secs(interval_mins * 60),
        Arc::clone(&feed),
    );

    let mut snapshots = feed.subscribe();
    let mut sync = OverlaySync::default();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutting down");
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                let collection = merge(&catalog, &snapshot);
                if let Err(error) = sync.sync(&mut renderer, &collection) {
                    log::error!("Overlay sync failed: {error}");
                }
            }
        }
    }

    scheduler.shutdown().await;
}
