//! Human agents.

use crate::agent::{draw_duration, relocate, roll_percent, StepContext, StepEffects, Steppable, Traits};
use lassa_core::{AgentId, HumanState, Position, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A human in the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Human {
    pub id: AgentId,
    pub position: Position,
    pub traits: Traits,
    pub state: HumanState,
    /// Ticks of treatment/isolation left; counts down only while Removed
    pub treatment_countdown: i64,
    /// Percent chance an exposed human is treated
    pub treatment_chance: u32,
    /// Percent chance an exposed human is isolated. Carried for collaborators;
    /// no transition consults it.
    pub isolation_chance: u32,
    /// Infectious ticks left, meaningful only while Infected
    pub disease_remaining: i64,
}

impl Human {
    pub fn new(
        id: AgentId,
        position: Position,
        traits: Traits,
        treatment_chance: u32,
        treatment_length: i64,
        isolation_chance: u32,
    ) -> Self {
        Self {
            id,
            position,
            traits,
            state: HumanState::Susceptible,
            treatment_countdown: treatment_length,
            treatment_chance,
            isolation_chance,
            disease_remaining: 0,
        }
    }

    /// Contact with an infectious rodent.
    ///
    /// Only a Susceptible human becomes Exposed. An already Exposed human
    /// stays Exposed: contact does not promote it to Infected. Removed humans
    /// are out of the dynamics and Infected ones are unaffected.
    /// Not being infected is not enough: Removed humans are never re-exposed.
    pub fn expose(&mut self) -> bool {
        match self.state {
            HumanState::Susceptible => {
                self.state = HumanState::Exposed;
                true
            }
            HumanState::Exposed | HumanState::Infected | HumanState::Removed => false,
        }
    }

    fn resolve_exposure(&mut self, ctx: &mut StepContext<'_>) -> Result<()> {
        if roll_percent(ctx.rng, self.treatment_chance) {
            self.state = HumanState::Removed;
        } else if ctx.rng.gen::<f64>() < self.traits.transmissibility {
            self.state = HumanState::Infected;
            self.disease_remaining = draw_duration(ctx.rng, self.traits.mean_disease_duration)?;
        } else {
            self.state = HumanState::Susceptible;
        }

        // Second, independent treatment roll overrides the outcome above
        if roll_percent(ctx.rng, self.treatment_chance) {
            self.state = HumanState::Removed;
        }

        Ok(())
    }
}

impl Steppable for Human {
    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<StepEffects> {
        let before = self.state;

        if self.state == HumanState::Removed {
            self.treatment_countdown -= 1;
            if self.treatment_countdown <= 0 {
                // Isolation never ends: the countdown only re-affirms Removed.
                self.state = HumanState::Removed;
            }
        }

        if self.state != HumanState::Removed
            && ctx.rng.gen::<f64>() < self.traits.movement_probability
        {
            relocate(self.id, &mut self.position, ctx)?;
        }

        if self.state == HumanState::Exposed {
            self.resolve_exposure(ctx)?;
        }

        if self.state == HumanState::Infected {
            self.disease_remaining -= 1;
            if self.disease_remaining <= 0 {
                self.state = HumanState::Removed;
            }
        }

        if self.state != before {
            trace!(
                agent = %self.id,
                from = before.label(),
                to = self.state.label(),
                "human transition"
            );
        }

        Ok(StepEffects::default())
    }
}
