//! Agent population and the shared stepping machinery.

use crate::grid::Grid;
use crate::human::Human;
use crate::rodent::Rodent;
use lassa_core::{AgentId, AgentKind, AgentSnapshot, AgentState, Error, Position, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};

/// Parameters every agent carries regardless of kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    pub movement_probability: f64,
    pub transmissibility: f64,
    pub mean_disease_duration: f64,
}

/// Mutable world state an agent may touch while stepping
pub struct StepContext<'a> {
    pub grid: &'a mut Grid,
    pub rng: &'a mut ChaCha8Rng,
}

/// Side effects of a step that reach beyond the stepped agent
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StepEffects {
    /// Cellmates an infectious rodent came into contact with
    pub contacts: Vec<AgentId>,
}

/// Anything that advances itself once per tick
pub trait Steppable {
    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<StepEffects>;
}

/// An agent of either kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Agent {
    Human(Human),
    Rodent(Rodent),
}

impl Agent {
    pub fn id(&self) -> AgentId {
        match self {
            Agent::Human(h) => h.id,
            Agent::Rodent(r) => r.id,
        }
    }

    pub fn kind(&self) -> AgentKind {
        match self {
            Agent::Human(_) => AgentKind::Human,
            Agent::Rodent(_) => AgentKind::Rodent,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Agent::Human(h) => h.position,
            Agent::Rodent(r) => r.position,
        }
    }

    pub fn state(&self) -> AgentState {
        match self {
            Agent::Human(h) => AgentState::Human(h.state),
            Agent::Rodent(r) => AgentState::Rodent(r.state),
        }
    }

    pub fn as_human(&self) -> Option<&Human> {
        match self {
            Agent::Human(h) => Some(h),
            Agent::Rodent(_) => None,
        }
    }

    pub fn as_rodent(&self) -> Option<&Rodent> {
        match self {
            Agent::Rodent(r) => Some(r),
            Agent::Human(_) => None,
        }
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id(),
            kind: self.kind(),
            position: self.position(),
            state: self.state(),
        }
    }
}

impl Steppable for Agent {
    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<StepEffects> {
        match self {
            Agent::Human(h) => h.step(ctx),
            Agent::Rodent(r) => r.step(ctx),
        }
    }
}

/// Move to a uniformly chosen Moore neighbour of the current cell
pub(crate) fn relocate(id: AgentId, position: &mut Position, ctx: &mut StepContext<'_>) -> Result<()> {
    let neighbors = ctx.grid.neighbors(*position);
    let target = *neighbors
        .choose(&mut *ctx.rng)
        .ok_or_else(|| Error::InvalidState(format!("no neighbours around {}", position)))?;

    ctx.grid.move_agent(id, target)?;
    *position = target;
    Ok(())
}

/// Remaining infectious ticks: an exponential draw rounded to the nearest integer
pub(crate) fn draw_duration<R: Rng + ?Sized>(rng: &mut R, mean: f64) -> Result<i64> {
    let exp = Exp::new(mean.recip()).map_err(|e| {
        Error::InvalidState(format!("cannot sample duration with mean {}: {}", mean, e))
    })?;
    Ok(exp.sample(rng).round() as i64)
}

/// Integer roll in 0..100 against a percentage
pub(crate) fn roll_percent<R: Rng + ?Sized>(rng: &mut R, percent: u32) -> bool {
    rng.gen_range(0..100u32) < percent
}
