//! 2D toroidal multi-occupancy grid.

use lassa_core::{AgentId, Direction, Error, Position, Result};
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// A 2D toroidal grid where any number of agents may share a cell
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: Vec<HashSet<AgentId>>,
    locations: HashMap<AgentId, Position>,
    occupied_cells: usize,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width.max(0) as usize).saturating_mul(height.max(0) as usize);
        Self {
            width,
            height,
            cells: vec![HashSet::new(); size],
            locations: HashMap::new(),
            occupied_cells: 0,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.in_bounds(self.width, self.height)
    }

    /// Moore neighbourhood of a position, wrapped, without the centre.
    ///
    /// On grids narrower than three cells several directions wrap onto the
    /// same cell; those duplicates are collapsed, so a 1x1 grid yields only
    /// the cell itself.
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(8);

        for direction in Direction::all() {
            let (dx, dy) = direction.to_delta();
            let neighbor_pos = pos.add(dx, dy).wrap(self.width, self.height);
            if !neighbors.contains(&neighbor_pos) {
                neighbors.push(neighbor_pos);
            }
        }

        neighbors
    }

    /// Agents currently at a position
    pub fn occupants(&self, pos: Position) -> impl Iterator<Item = AgentId> + '_ {
        let wrapped = pos.wrap(self.width, self.height);
        let index = self.pos_to_index(wrapped);
        self.cells[index].iter().copied()
    }

    pub fn is_cell_empty(&self, pos: Position) -> bool {
        let wrapped = pos.wrap(self.width, self.height);
        self.cells[self.pos_to_index(wrapped)].is_empty()
    }

    pub fn position_of(&self, id: AgentId) -> Option<Position> {
        self.locations.get(&id).copied()
    }

    pub fn occupied_cell_count(&self) -> usize {
        self.occupied_cells
    }

    pub fn agent_count(&self) -> usize {
        self.locations.len()
    }

    /// Put an agent on the grid for the first time
    pub fn place(&mut self, id: AgentId, pos: Position) -> Result<()> {
        if let Some(existing) = self.locations.get(&id) {
            return Err(Error::InvalidState(format!(
                "agent {} is already placed at {}",
                id, existing
            )));
        }

        let wrapped = pos.wrap(self.width, self.height);
        self.insert_into_cell(id, wrapped);
        self.locations.insert(id, wrapped);
        Ok(())
    }

    /// Relocate a placed agent, returning its previous position
    pub fn move_agent(&mut self, id: AgentId, new_pos: Position) -> Result<Position> {
        let previous = self
            .locations
            .get(&id)
            .copied()
            .ok_or_else(|| Error::NotFound(format!("agent {} is not on the grid", id)))?;

        let wrapped = new_pos.wrap(self.width, self.height);
        if wrapped != previous {
            self.remove_from_cell(id, previous);
            self.insert_into_cell(id, wrapped);
            self.locations.insert(id, wrapped);
        }

        Ok(previous)
    }

    /// A uniformly chosen free cell, or any uniformly chosen cell when the
    /// grid has no free cell left. Never fails.
    pub fn random_unoccupied_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let free = self.cells.len() - self.occupied_cells;

        if free == 0 {
            let x = rng.gen_range(0..self.width);
            let y = rng.gen_range(0..self.height);
            return Position::new(x, y);
        }

        let target = rng.gen_range(0..free);
        let index = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .nth(target)
            .map(|(i, _)| i)
            .unwrap_or(0);

        self.index_to_pos(index)
    }

    fn insert_into_cell(&mut self, id: AgentId, pos: Position) {
        let index = self.pos_to_index(pos);
        let cell = &mut self.cells[index];
        if cell.is_empty() {
            self.occupied_cells += 1;
        }
        cell.insert(id);
    }

    fn remove_from_cell(&mut self, id: AgentId, pos: Position) {
        let index = self.pos_to_index(pos);
        let cell = &mut self.cells[index];
        if cell.remove(&id) && cell.is_empty() {
            self.occupied_cells -= 1;
        }
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    /// Iterator over all positions
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }
}
