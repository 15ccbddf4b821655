//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an agent, shared across humans and rodents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Apply toroidal wrapping for given world dimensions
    pub fn wrap(&self, width: i32, height: i32) -> Self {
        Self {
            x: ((self.x % width) + width) % width,
            y: ((self.y % height) + height) % height,
        }
    }

    pub fn in_bounds(&self, width: i32, height: i32) -> bool {
        (0..width).contains(&self.x) && (0..height).contains(&self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The eight Moore-neighbourhood directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }

    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::NorthEast,
            Direction::NorthWest,
            Direction::SouthEast,
            Direction::SouthWest,
        ]
    }
}

/// Which population an agent belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Human,
    Rodent,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Human => write!(f, "human"),
            AgentKind::Rodent => write!(f, "rodent"),
        }
    }
}

/// Epidemiological state of a human
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HumanState {
    Susceptible,
    /// Infected but not yet resolved to Infected, Removed, or back to Susceptible
    Exposed,
    Infected,
    /// Isolated, recovered, or otherwise out of the disease dynamics
    Removed,
}

impl HumanState {
    pub fn label(&self) -> &'static str {
        match self {
            HumanState::Susceptible => "susceptible",
            HumanState::Exposed => "exposed",
            HumanState::Infected => "infected",
            HumanState::Removed => "removed",
        }
    }
}

/// Epidemiological state of a rodent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RodentState {
    Susceptible,
    Infected,
    /// Terminal. The rodent keeps its cell but never acts again.
    Dead,
}

impl RodentState {
    pub fn label(&self) -> &'static str {
        match self {
            RodentState::Susceptible => "susceptible",
            RodentState::Infected => "infected",
            RodentState::Dead => "dead",
        }
    }
}

/// Kind-tagged state of any agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    Human(HumanState),
    Rodent(RodentState),
}

impl AgentState {
    pub fn kind(&self) -> AgentKind {
        match self {
            AgentState::Human(_) => AgentKind::Human,
            AgentState::Rodent(_) => AgentKind::Rodent,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgentState::Human(state) => state.label(),
            AgentState::Rodent(state) => state.label(),
        }
    }
}

/// Read-only view of one agent for rendering collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub kind: AgentKind,
    pub position: Position,
    pub state: AgentState,
}

impl AgentSnapshot {
    pub fn label(&self) -> &'static str {
        self.state.label()
    }
}
