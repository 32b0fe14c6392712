//! Supplyboard - renders every supply-chain dashboard once and prints the
//! snapshot as JSON.
//!
//! # Environment
//!
//! - `SUPPLYBOARD_DATASET` - JSON dataset to load (default: built-in sample)
//! - `SUPPLYBOARD_CRITICAL_SHELF_HOURS` / `SUPPLYBOARD_WARNING_SHELF_HOURS`
//! - `SUPPLYBOARD_SHELF_LIFE_CEILING_HOURS`
//! - `SUPPLYBOARD_TOP_STORES`
//! - `RUST_LOG` - log filter, logs go to stderr

use std::io::{self, Write};

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use supplyboard::config::Config;
use supplyboard::dashboard::{Dashboard, DashboardCriteria};
use supplyboard::source::{Dataset, load_dataset};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the snapshot
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive("supplyboard=info".parse()?))
        .init();

    let config = Config::from_env();
    info!(
        critical_shelf_hours = config.thresholds.critical_shelf_hours,
        warning_shelf_hours = config.thresholds.warning_shelf_hours,
        top_stores = config.thresholds.top_stores,
        "Starting Supplyboard"
    );

    let dataset = match &config.dataset {
        Some(path) => load_dataset(path).await?,
        None => {
            info!("No dataset configured, using built-in sample");
            Dataset::sample()?
        }
    };

    let mut dashboard = Dashboard::new(dataset, config.thresholds);
    let snapshot = dashboard.snapshot(&DashboardCriteria::default());

    let inventory = &snapshot.inventory.summary;
    info!(
        total = inventory.total,
        critical = inventory.critical,
        low = inventory.low,
        affected_stores = inventory.affected_stores,
        "Inventory"
    );
    let vehicles = &snapshot.vehicles.summary;
    info!(
        active = vehicles.active_vehicles,
        delayed = vehicles.delayed_vehicles,
        perishable_risks = vehicles.perishable_risks,
        fleet_on_time_rate = snapshot.fleet_on_time_rate,
        "Traffic"
    );
    let windows = &snapshot.delivery_windows.summary;
    info!(
        windows = windows.windows,
        non_compliant = windows.non_compliant,
        high_risk = windows.high_risk,
        "Delivery windows"
    );
    let integrations = &snapshot.api_status.summary;
    info!(
        online = integrations.online,
        needs_reconnect = integrations.needs_reconnect.len(),
        "Integrations"
    );

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &snapshot)?;
    writeln!(stdout)?;

    Ok(())
}
