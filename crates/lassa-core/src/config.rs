//! Configuration types for the simulation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Model parameters supplied once at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of humans
    pub human_population: u32,
    /// Number of rodents
    pub rodent_population: u32,
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
    /// Probability that a rodent starts infected (0.0 to 1.0)
    pub initial_infection: f64,
    /// Per-contact infection probability (0.0 to 1.0)
    pub transmissibility: f64,
    /// Per-tick chance of moving to a neighbouring cell (0.0 to 1.0)
    pub movement_probability: f64,
    /// Mean of the exponential disease duration, in ticks
    pub mean_disease_duration: f64,
    /// Chance an exposed human is treated (percent)
    pub treatment_chance: u32,
    /// Length of treatment/isolation, in ticks
    pub treatment_length: i64,
    /// Chance an exposed human is isolated (percent)
    pub isolation_chance: u32,
    /// Chance a rodent stays still for a tick (percent)
    pub environmental_stillness: u32,
    /// Chance a rodent is killed by pesticide each tick (percent)
    pub pesticide_kill: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            human_population: 200,
            rodent_population: 200,
            width: 20,
            height: 20,
            initial_infection: 0.9,
            transmissibility: 1.0,
            movement_probability: 0.56,
            mean_disease_duration: 7.0,
            treatment_chance: 35,
            treatment_length: 40,
            isolation_chance: 60,
            environmental_stillness: 1,
            pesticide_kill: 1,
        }
    }
}

impl ModelConfig {
    /// Reject any parameter outside its declared range
    pub fn validate(&self) -> Result<()> {
        if self.width < 1 {
            return Err(invalid("width", "must be at least 1", self.width));
        }
        if self.height < 1 {
            return Err(invalid("height", "must be at least 1", self.height));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(invalid(
                "width * height",
                "must fit the cell index range",
                format!("{}x{}", self.width, self.height),
            ));
        }
        if self
            .human_population
            .checked_add(self.rodent_population)
            .is_none()
        {
            return Err(invalid(
                "human_population + rodent_population",
                "must not exceed u32::MAX",
                format!("{} + {}", self.human_population, self.rodent_population),
            ));
        }

        check_probability("initial_infection", self.initial_infection)?;
        check_probability("transmissibility", self.transmissibility)?;
        check_probability("movement_probability", self.movement_probability)?;

        if !self.mean_disease_duration.is_finite() || self.mean_disease_duration <= 0.0 {
            return Err(invalid(
                "mean_disease_duration",
                "must be a positive finite number",
                self.mean_disease_duration,
            ));
        }
        if self.treatment_length <= 0 {
            return Err(invalid(
                "treatment_length",
                "must be greater than 0",
                self.treatment_length,
            ));
        }

        check_percent("treatment_chance", self.treatment_chance)?;
        check_percent("isolation_chance", self.isolation_chance)?;
        check_percent("environmental_stillness", self.environmental_stillness)?;
        check_percent("pesticide_kill", self.pesticide_kill)?;

        Ok(())
    }

    pub fn total_population(&self) -> u32 {
        self.human_population.saturating_add(self.rodent_population)
    }
}

fn invalid(field: &str, rule: &str, value: impl std::fmt::Display) -> Error {
    Error::Validation(format!("{} {}, got {}", field, rule, value))
}

fn check_probability(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, "must be within [0, 1]", value));
    }
    Ok(())
}

fn check_percent(field: &str, value: u32) -> Result<()> {
    if value > 100 {
        return Err(invalid(field, "must be a percentage within [0, 100]", value));
    }
    Ok(())
}

/// Headless run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of ticks to run the simulation
    pub num_ticks: u64,
    /// Model parameters
    pub model: ModelConfig,
    /// Emit a progress log line every this many ticks (0 disables)
    pub log_interval: u64,
    /// Where to write the statistics series as JSON
    pub statistics_path: Option<String>,
    /// Where to write a checkpoint of the final state
    pub checkpoint_path: Option<String>,
    /// Resume from this checkpoint instead of building a fresh model
    pub resume_path: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_ticks: 100,
            model: ModelConfig::default(),
            log_interval: 10,
            statistics_path: None,
            checkpoint_path: None,
            resume_path: None,
        }
    }
}

impl RunConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&contents)?;
        config.model.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = ModelConfig::default();
        assert_eq!(config.width, 20);
        assert_eq!(config.height, 20);
        assert_eq!(config.total_population(), 400);
        assert!(config.validate().is_ok());

        let run = RunConfig::default();
        assert_eq!(run.num_ticks, 100);
        assert!(run.statistics_path.is_none());
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let config = ModelConfig {
            width: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("width"));

        let config = ModelConfig {
            height: -3,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("height"));
    }

    #[test]
    fn test_rejects_overflowing_sizes() {
        let config = ModelConfig {
            width: i32::MAX,
            height: 2,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        let config = ModelConfig {
            human_population: u32::MAX,
            rodent_population: 1,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("human_population + rodent_population"));
        assert_eq!(config.total_population(), u32::MAX);
    }

    #[test]
    fn test_rejects_out_of_range_probabilities() {
        let cases = [
            ModelConfig {
                initial_infection: 1.5,
                ..Default::default()
            },
            ModelConfig {
                transmissibility: -0.1,
                ..Default::default()
            },
            ModelConfig {
                movement_probability: f64::NAN,
                ..Default::default()
            },
        ];

        for config in cases {
            assert!(matches!(config.validate(), Err(Error::Validation(_))));
        }
    }

    #[test]
    fn test_rejects_bad_durations() {
        for mean in [0.0, -7.0, f64::INFINITY, f64::NAN] {
            let config = ModelConfig {
                mean_disease_duration: mean,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("mean_disease_duration"));
        }

        let config = ModelConfig {
            treatment_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_percent_above_hundred() {
        let config = ModelConfig {
            pesticide_kill: 101,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pesticide_kill"));

        let config = ModelConfig {
            treatment_chance: 100,
            environmental_stillness: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "num_ticks": 5, "model": { "seed": 9, "width": 4 } }"#;
        let run: RunConfig = serde_json::from_str(json).unwrap();
        assert_eq!(run.num_ticks, 5);
        assert_eq!(run.model.seed, 9);
        assert_eq!(run.model.width, 4);
        assert_eq!(run.model.height, 20);
    }
}
