//! Gang zone demo runner
//!
//! This binary:
//! 1. Lays out a grid of checked zones and shows them to every player
//! 2. Walks simulated players across the grid at a fixed tick rate
//! 3. Captures a zone once it has been entered often enough
//!
//! Environment:
//! - `TARGET_FPS` - ticks per second (default 20)
//! - `ZONE_TICKS` - ticks before exiting, 0 for no limit (default 400)
//! - `ZONE_PLAYERS` - simulated players (default 4)
//! - `ZONE_COUNT` - zones on the grid (default 16)

mod config;
mod sim;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::info;

use crate::config::RunnerConfig;
use crate::sim::Simulation;

fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("zone_runner=info".parse()?)
                .add_directive("zone_core=info".parse()?),
        )
        .init();

    let config = RunnerConfig::from_env()?;
    info!(?config, "Starting gang zone runner");

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || running_clone.store(false, Ordering::SeqCst))?;

    let mut sim = Simulation::new(&config);
    info!(
        zones = sim.zones().len(),
        players = config.players,
        "World ready"
    );

    let target_delta = config.tick_period()?;
    let mut tick: u64 = 0;

    while running.load(Ordering::SeqCst) {
        if config.ticks != 0 && tick >= config.ticks {
            break;
        }

        let start = Instant::now();

        sim.tick(tick);
        tick += 1;

        if tick.is_multiple_of(100) {
            info!(tick, zones = sim.zones().len(), "progress");
        }

        // Sleep to maintain target FPS
        let elapsed = start.elapsed();
        if elapsed < target_delta {
            std::thread::sleep(target_delta - elapsed);
        }
    }

    let stats = sim.stats();
    info!(
        tick,
        enters = stats.enters,
        leaves = stats.leaves,
        captured = stats.captured,
        destroyed = stats.destroyed,
        remaining = sim.zones().len(),
        "Shutting down"
    );

    Ok(())
}
