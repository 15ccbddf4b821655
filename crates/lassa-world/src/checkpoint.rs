//! Checkpoint and restore functionality.

use crate::agent::Agent;
use lassa_core::{Error, ModelConfig, Result, StatisticsSeries};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const CHECKPOINT_VERSION: u32 = 1;

/// Everything needed to resume a run: configuration, tick, the position of
/// the random stream, every agent with its counters, and the statistics so far
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: u32,
    pub timestamp: i64,
    pub config: ModelConfig,
    pub tick: u64,
    pub rng: ChaCha8Rng,
    pub agents: Vec<Agent>,
    pub statistics: StatisticsSeries,
}

impl Checkpoint {
    pub fn new(
        config: ModelConfig,
        tick: u64,
        rng: ChaCha8Rng,
        agents: Vec<Agent>,
        statistics: StatisticsSeries,
    ) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            timestamp: chrono::Utc::now().timestamp(),
            config,
            tick,
            rng,
            agents,
            statistics,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| Error::Serialization(format!("Failed to serialize checkpoint: {}", e)))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let checkpoint: Checkpoint = bincode::deserialize(bytes)
            .map_err(|e| Error::Serialization(format!("Failed to deserialize checkpoint: {}", e)))?;

        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(Error::InvalidState(format!(
                "unsupported checkpoint version {} (expected {})",
                checkpoint.version, CHECKPOINT_VERSION
            )));
        }

        Ok(checkpoint)
    }

    /// Write to a file, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_bytes()?)?;
        info!(tick = self.tick, "Checkpoint written to {:?}", path);
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let checkpoint = Self::from_bytes(&bytes)?;
        info!(
            tick = checkpoint.tick,
            timestamp = checkpoint.timestamp,
            "Checkpoint loaded from {:?}",
            path.as_ref()
        );
        Ok(checkpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Simulation;

    fn config() -> ModelConfig {
        ModelConfig {
            seed: 17,
            human_population: 25,
            rodent_population: 25,
            width: 6,
            height: 6,
            ..Default::default()
        }
    }

    #[test]
    fn test_checkpoint_bytes_preserve_state() {
        let mut sim = Simulation::new(config()).unwrap();
        for _ in 0..4 {
            sim.advance_tick().unwrap();
        }

        let checkpoint = sim.checkpoint();
        let bytes = checkpoint.to_bytes().unwrap();
        let decoded = Checkpoint::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.version, CHECKPOINT_VERSION);
        assert_eq!(decoded.tick, 4);
        assert_eq!(decoded.config, checkpoint.config);
        assert_eq!(decoded.agents, checkpoint.agents);
        assert_eq!(decoded.statistics, checkpoint.statistics);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let sim = Simulation::new(config()).unwrap();
        let mut checkpoint = sim.checkpoint();
        checkpoint.version = 99;
        let bytes = checkpoint.to_bytes().unwrap();

        assert!(matches!(
            Checkpoint::from_bytes(&bytes),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Checkpoint::from_bytes(&[1, 2, 3]),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_restore_rejects_mismatched_statistics() {
        let sim = Simulation::new(config()).unwrap();
        let mut checkpoint = sim.checkpoint();
        checkpoint.tick = 3;

        assert!(matches!(
            Simulation::restore(checkpoint),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("lassa-checkpoint-{}", std::process::id()));
        let path = dir.join("run.bin");

        let mut sim = Simulation::new(config()).unwrap();
        sim.advance_tick().unwrap();
        sim.checkpoint().save(&path).unwrap();

        let loaded = Checkpoint::load(&path).unwrap();
        assert_eq!(loaded.tick, 1);
        assert_eq!(loaded.agents.len(), 50);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
