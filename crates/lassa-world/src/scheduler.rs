//! Random activation scheduler.

use lassa_core::AgentId;
use rand::seq::SliceRandom;
use rand::Rng;

/// Activates every registered agent once per tick in a fresh random order
#[derive(Debug, Clone, Default)]
pub struct RandomActivation {
    agents: Vec<AgentId>,
}

impl RandomActivation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: AgentId) {
        self.agents.push(id);
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Registered agents in insertion order
    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    /// A new uniform permutation of all agents, drawn on every call
    pub fn activation_order<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<AgentId> {
        let mut order = self.agents.clone();
        order.shuffle(rng);
        order
    }
}
