//! Rodent agents, the disease reservoir.

use crate::agent::{draw_duration, relocate, roll_percent, StepContext, StepEffects, Steppable, Traits};
use lassa_core::{AgentId, Position, Result, RodentState};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A rodent in the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rodent {
    pub id: AgentId,
    pub position: Position,
    pub traits: Traits,
    pub state: RodentState,
    /// Percent chance of being killed by pesticide each tick
    pub pesticide_kill: u32,
    /// Percent chance of doing nothing for a tick
    pub environmental_stillness: u32,
    /// Infectious ticks left, meaningful only while Infected
    pub disease_remaining: i64,
}

impl Rodent {
    /// Create a rodent, infected at the start with probability `initial_infection`
    pub fn new<R: Rng + ?Sized>(
        id: AgentId,
        position: Position,
        traits: Traits,
        pesticide_kill: u32,
        environmental_stillness: u32,
        initial_infection: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let mut rodent = Self {
            id,
            position,
            traits,
            state: RodentState::Susceptible,
            pesticide_kill,
            environmental_stillness,
            disease_remaining: 0,
        };

        if rng.gen::<f64>() < initial_infection {
            rodent.state = RodentState::Infected;
            rodent.disease_remaining = draw_duration(rng, traits.mean_disease_duration)?;
        }

        Ok(rodent)
    }

    pub fn is_dead(&self) -> bool {
        self.state == RodentState::Dead
    }

    /// Every other agent in this rodent's cell
    fn cellmates(&self, ctx: &StepContext<'_>) -> Vec<AgentId> {
        let mut cellmates: Vec<AgentId> = ctx
            .grid
            .occupants(self.position)
            .filter(|other| *other != self.id)
            .collect();
        cellmates.sort();
        cellmates
    }
}

impl Steppable for Rodent {
    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<StepEffects> {
        if self.is_dead() {
            return Ok(StepEffects::default());
        }

        if roll_percent(ctx.rng, self.pesticide_kill) {
            trace!(agent = %self.id, from = self.state.label(), "rodent killed by pesticide");
            self.state = RodentState::Dead;
            return Ok(StepEffects::default());
        }

        // Stillness skips the whole tick, including the duration countdown
        if roll_percent(ctx.rng, self.environmental_stillness) {
            return Ok(StepEffects::default());
        }

        if ctx.rng.gen::<f64>() < self.traits.movement_probability {
            relocate(self.id, &mut self.position, ctx)?;
        }

        let mut effects = StepEffects::default();

        if self.state == RodentState::Infected {
            effects.contacts = self.cellmates(ctx);

            self.disease_remaining -= 1;
            if self.disease_remaining <= 0 {
                trace!(agent = %self.id, "rodent recovered");
                self.state = RodentState::Susceptible;
            }
        }

        Ok(effects)
    }
}
