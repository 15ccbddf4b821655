//! Per-tick statistics collection.

use crate::agent::Agent;
use lassa_core::{Result, StatisticsRecord, StatisticsSeries};
use tracing::trace;

/// Scans the population and appends one record per call
#[derive(Debug, Clone, Default)]
pub struct StatisticsCollector {
    series: StatisticsSeries,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume collection on top of an existing series
    pub fn from_series(series: StatisticsSeries) -> Self {
        Self { series }
    }

    pub fn collect(&mut self, tick: u64, agents: &[Agent]) -> Result<StatisticsRecord> {
        let record = StatisticsRecord::from_states(tick, agents.iter().map(Agent::state));
        self.series.push(record)?;

        trace!(
            tick,
            infected_humans = record.infected_humans,
            exposed_humans = record.exposed_humans,
            removed_humans = record.removed_humans,
            dead_rodents = record.dead_rodents,
            "statistics collected"
        );

        Ok(record)
    }

    pub fn series(&self) -> &StatisticsSeries {
        &self.series
    }
}
