use crate::agent::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Moore neighborhood offsets, center excluded, in row-major order.
const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Toroidal cell index: which agents stand on which cell.
///
/// Cells keep their occupants in arrival order. Every stored position is in
/// `[0, width) x [0, height)`.
#[derive(Clone, Debug)]
pub struct TorusGrid {
    width: usize,
    height: usize,
    cells: Vec<Vec<AgentId>>,
    positions: HashMap<AgentId, Position>,
}

impl TorusGrid {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self {
            width,
            height,
            cells: vec![Vec::new(); width * height],
            positions: HashMap::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of placed agents.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Map signed coordinates onto the torus.
    pub fn wrap(&self, x: isize, y: isize) -> Position {
        Position {
            x: x.rem_euclid(self.width as isize) as usize,
            y: y.rem_euclid(self.height as isize) as usize,
        }
    }

    /// The 8 surrounding cells, wrapped. On grids narrower than 3 cells some
    /// entries repeat; the list always has 8 entries.
    pub fn neighbors(&self, pos: Position) -> [Position; 8] {
        debug_assert!(self.contains(pos), "position {pos:?} out of bounds");
        MOORE_OFFSETS.map(|(dx, dy)| self.wrap(pos.x as isize + dx, pos.y as isize + dy))
    }

    /// Occupants of `pos`; empty for positions off the grid.
    pub fn agents_at(&self, pos: Position) -> &[AgentId] {
        if !self.contains(pos) {
            return &[];
        }
        self.cells
            .get(self.cell_index(pos))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn position_of(&self, id: AgentId) -> Option<Position> {
        self.positions.get(&id).copied()
    }

    /// Put `id` on `pos`. An agent that is already placed is moved instead.
    pub fn place_agent(&mut self, id: AgentId, pos: Position) {
        debug_assert!(self.contains(pos), "position {pos:?} out of bounds");
        if self.positions.contains_key(&id) {
            self.move_agent(id, pos);
            return;
        }
        let idx = self.cell_index(pos);
        self.cells[idx].push(id);
        self.positions.insert(id, pos);
    }

    /// Relocate a placed agent. Returns false if `id` is not on the grid.
    pub fn move_agent(&mut self, id: AgentId, new_pos: Position) -> bool {
        debug_assert!(self.contains(new_pos), "position {new_pos:?} out of bounds");
        let Some(old_pos) = self.positions.get(&id).copied() else {
            return false;
        };
        if old_pos != new_pos {
            self.detach(id, old_pos);
            let idx = self.cell_index(new_pos);
            self.cells[idx].push(id);
            self.positions.insert(id, new_pos);
        }
        true
    }

    /// Take `id` off the grid, returning where it stood.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<Position> {
        let pos = self.positions.remove(&id)?;
        self.detach(id, pos);
        Some(pos)
    }

    fn detach(&mut self, id: AgentId, pos: Position) {
        let idx = self.cell_index(pos);
        let cell = &mut self.cells[idx];
        if let Some(slot) = cell.iter().position(|&other| other == id) {
            cell.remove(slot);
        }
    }

    fn cell_index(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_wrap_at_corner() {
        let grid = TorusGrid::new(5, 4);
        let mut result = grid.neighbors(Position::new(0, 0)).to_vec();
        result.sort_by_key(|p| (p.y, p.x));
        assert_eq!(
            result,
            vec![
                Position::new(1, 0),
                Position::new(4, 0),
                Position::new(0, 1),
                Position::new(1, 1),
                Position::new(4, 1),
                Position::new(0, 3),
                Position::new(1, 3),
                Position::new(4, 3),
            ]
        );
    }

    #[test]
    fn neighbors_exclude_center_and_stay_in_bounds() {
        let grid = TorusGrid::new(7, 3);
        for y in 0..3 {
            for x in 0..7 {
                let center = Position::new(x, y);
                let ns = grid.neighbors(center);
                assert!(ns.iter().all(|&p| grid.contains(p)));
                assert!(!ns.contains(&center));
            }
        }
    }

    #[test]
    fn single_cell_torus_neighbors_are_itself() {
        let grid = TorusGrid::new(1, 1);
        assert!(grid
            .neighbors(Position::new(0, 0))
            .iter()
            .all(|&p| p == Position::new(0, 0)));
    }

    #[test]
    fn wrap_handles_negative_and_overflowing_coordinates() {
        let grid = TorusGrid::new(10, 6);
        assert_eq!(grid.wrap(-1, -1), Position::new(9, 5));
        assert_eq!(grid.wrap(23, 13), Position::new(3, 1));
    }

    #[test]
    fn cells_hold_multiple_agents_in_arrival_order() {
        let mut grid = TorusGrid::new(3, 3);
        let pos = Position::new(1, 2);
        grid.place_agent(AgentId(0), pos);
        grid.place_agent(AgentId(5), pos);
        grid.place_agent(AgentId(2), pos);
        assert_eq!(grid.agents_at(pos), &[AgentId(0), AgentId(5), AgentId(2)]);
        assert_eq!(grid.len(), 3);
    }

    #[test]
    fn off_grid_position_has_no_occupants() {
        let mut grid = TorusGrid::new(4, 4);
        grid.place_agent(AgentId(1), Position::new(1, 1));
        assert!(grid.agents_at(Position::new(5, 0)).is_empty());
        assert!(grid.agents_at(Position::new(0, 4)).is_empty());
        assert_eq!(grid.agents_at(Position::new(1, 1)), &[AgentId(1)]);
    }

    #[test]
    fn move_updates_both_cells() {
        let mut grid = TorusGrid::new(4, 4);
        let from = Position::new(0, 0);
        let to = Position::new(3, 3);
        grid.place_agent(AgentId(1), from);
        assert!(grid.move_agent(AgentId(1), to));
        assert!(grid.agents_at(from).is_empty());
        assert_eq!(grid.agents_at(to), &[AgentId(1)]);
        assert_eq!(grid.position_of(AgentId(1)), Some(to));
        assert!(!grid.move_agent(AgentId(9), to));
    }

    #[test]
    fn remove_clears_index() {
        let mut grid = TorusGrid::new(4, 4);
        let pos = Position::new(2, 1);
        grid.place_agent(AgentId(1), pos);
        grid.place_agent(AgentId(2), pos);
        assert_eq!(grid.remove_agent(AgentId(1)), Some(pos));
        assert_eq!(grid.agents_at(pos), &[AgentId(2)]);
        assert_eq!(grid.position_of(AgentId(1)), None);
        assert_eq!(grid.remove_agent(AgentId(1)), None);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn placing_twice_moves_instead_of_duplicating() {
        let mut grid = TorusGrid::new(4, 4);
        grid.place_agent(AgentId(1), Position::new(0, 0));
        grid.place_agent(AgentId(1), Position::new(1, 0));
        assert!(grid.agents_at(Position::new(0, 0)).is_empty());
        assert_eq!(grid.agents_at(Position::new(1, 0)), &[AgentId(1)]);
        assert_eq!(grid.len(), 1);
    }
}
