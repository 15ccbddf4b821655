//! World simulation engine.
//!
//! This module implements the toroidal grid shared by humans and the rodent
//! reservoir, the per-agent disease state machines, and the tick loop that
//! drives them.

pub mod agent;
pub mod checkpoint;
pub mod grid;
pub mod human;
pub mod rodent;
pub mod scheduler;
pub mod simulation;
pub mod statistics;

pub use agent::{Agent, StepContext, StepEffects, Steppable, Traits};
pub use checkpoint::Checkpoint;
pub use grid::Grid;
pub use human::Human;
pub use rodent::Rodent;
pub use scheduler::RandomActivation;
pub use simulation::Simulation;
pub use statistics::StatisticsCollector;
