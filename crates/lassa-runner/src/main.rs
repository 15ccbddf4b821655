//! Headless driver: runs the disease model for a fixed number of ticks and
//! writes the statistics series.

mod telemetry;

use anyhow::{Context, Result};
use lassa_core::{RunConfig, StatisticsSeries};
use lassa_world::{Checkpoint, Simulation};
use std::io::Write;
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::from_json_file(&path)
            .with_context(|| format!("failed to load run configuration from {}", path))?,
        None => RunConfig::default(),
    };

    info!("Starting Lassa spread simulation");
    info!(
        num_ticks = config.num_ticks,
        seed = config.model.seed,
        "Run configuration loaded"
    );

    let mut simulation = match &config.resume_path {
        Some(path) => {
            let checkpoint = Checkpoint::load(path)
                .with_context(|| format!("failed to load checkpoint from {}", path))?;
            Simulation::restore(checkpoint)?
        }
        None => Simulation::new(config.model.clone())?,
    };

    simulation.run(config.num_ticks, config.log_interval)?;

    match &config.statistics_path {
        Some(path) => {
            write_statistics(simulation.statistics_series(), Path::new(path))?;
            info!("Statistics written to {}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, simulation.statistics_series())?;
            writeln!(handle)?;
        }
    }

    if let Some(path) = &config.checkpoint_path {
        simulation
            .checkpoint()
            .save(path)
            .with_context(|| format!("failed to write checkpoint to {}", path))?;
    }

    info!(final_tick = simulation.tick(), "Shutting down runner");
    Ok(())
}

fn write_statistics(series: &StatisticsSeries, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(series)?;
    std::fs::write(path, json)?;
    Ok(())
}
