//! Aggregate statistics recorded once per tick.

use crate::{AgentState, Error, HumanState, Result, RodentState};
use serde::{Deserialize, Serialize};

/// Population counts at the end of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    /// Tick index; 0 is the state before any tick has run
    pub tick: u64,
    pub infected_humans: u64,
    pub susceptible_humans: u64,
    pub dead_rodents: u64,
    pub exposed_humans: u64,
    pub removed_humans: u64,
    pub susceptible_rodents: u64,
    pub infected_rodents: u64,
}

impl StatisticsRecord {
    /// Tally a full scan of agent states
    pub fn from_states(tick: u64, states: impl IntoIterator<Item = AgentState>) -> Self {
        let mut record = Self {
            tick,
            ..Default::default()
        };

        for state in states {
            match state {
                AgentState::Human(HumanState::Susceptible) => record.susceptible_humans += 1,
                AgentState::Human(HumanState::Exposed) => record.exposed_humans += 1,
                AgentState::Human(HumanState::Infected) => record.infected_humans += 1,
                AgentState::Human(HumanState::Removed) => record.removed_humans += 1,
                AgentState::Rodent(RodentState::Susceptible) => record.susceptible_rodents += 1,
                AgentState::Rodent(RodentState::Infected) => record.infected_rodents += 1,
                AgentState::Rodent(RodentState::Dead) => record.dead_rodents += 1,
            }
        }

        record
    }

    pub fn total_humans(&self) -> u64 {
        self.susceptible_humans + self.exposed_humans + self.infected_humans + self.removed_humans
    }

    pub fn total_rodents(&self) -> u64 {
        self.susceptible_rodents + self.infected_rodents + self.dead_rodents
    }

    /// Counts under the labels used by chart collaborators
    pub fn named_counts(&self) -> [(&'static str, u64); 5] {
        [
            ("Infected Humans", self.infected_humans),
            ("Susceptible Humans", self.susceptible_humans),
            ("Deceased Rodents", self.dead_rodents),
            ("Exposed Humans", self.exposed_humans),
            ("Removed/Recovered/Isolated Humans", self.removed_humans),
        ]
    }
}

/// Append-only time series of records, indexed by tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSeries {
    records: Vec<StatisticsRecord>,
}

impl StatisticsSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next record. Ticks must arrive in order starting at 0.
    pub fn push(&mut self, record: StatisticsRecord) -> Result<()> {
        let expected = self.records.len() as u64;
        if record.tick != expected {
            return Err(Error::InvalidState(format!(
                "statistics record for tick {} appended where tick {} was expected",
                record.tick, expected
            )));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn get(&self, tick: u64) -> Option<&StatisticsRecord> {
        self.records.get(tick as usize)
    }

    pub fn latest(&self) -> Option<&StatisticsRecord> {
        self.records.last()
    }

    pub fn records(&self) -> &[StatisticsRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatisticsRecord> + '_ {
        self.records.iter()
    }
}
