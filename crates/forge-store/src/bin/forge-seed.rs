//! Initialize a catalog database.
//!
//! Usage: `forge-seed [CONFIG.toml]`. Without a config file the catalog is
//! written to `forge.db` in the current directory using the starter data.

use forge_store::seed::{self, SeedOutcome};
use forge_store::{Store, StoreConfig, StoreResult, logging};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};

const DEFAULT_DATABASE: &str = "forge.db";

fn run() -> StoreResult<()> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => StoreConfig::load(Path::new(&path))?,
        None => StoreConfig::with_database(DEFAULT_DATABASE),
    };

    let mut store = Store::open(&config)?;
    match seed::seed_from_source(&mut store, &config.seed)? {
        SeedOutcome::Seeded { aggregates } => info!(aggregates, "seeding finished"),
        SeedOutcome::Skipped => info!("nothing seeded"),
    }

    let counts = store.counts()?;
    info!(
        items = counts.items,
        buildings = counts.buildings,
        recipes = counts.recipes,
        plans = counts.plans,
        "catalog ready"
    );
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "forge-seed failed");
            ExitCode::FAILURE
        }
    }
}
