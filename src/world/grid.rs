//! Cube grid with cell states and entity registries
//!
//! The grid is the single owner of every robot and monster. Cell occupancy
//! is the inverse index of the registries: whenever an entity leaves a cell
//! the cell state is recomputed from whoever still stands there.

use serde::{Deserialize, Serialize};

use crate::core::types::{Direction, EntityKind, EntityRef, MonsterId, Position, RobotId};
use crate::entity::monster::Monster;
use crate::entity::robot::Robot;

/// State of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Free,
    Blocked,
    RobotOccupied,
    MonsterOccupied,
    /// Returned by queries for out-of-bounds coordinates, never stored
    Invalid,
}

impl CellState {
    pub fn is_free(&self) -> bool {
        matches!(self, CellState::Free)
    }
}

impl From<EntityKind> for CellState {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Robot => CellState::RobotOccupied,
            EntityKind::Monster => CellState::MonsterOccupied,
        }
    }
}

/// An entity taken out of its registry
#[derive(Debug, Clone)]
pub enum Removed {
    Robot(Robot),
    Monster(Monster),
}

/// Cell counts by state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridStats {
    pub size: u32,
    pub free: usize,
    pub blocked: usize,
    pub robot_cells: usize,
    pub monster_cells: usize,
    pub robots: usize,
    pub monsters: usize,
}

/// NxNxN world
#[derive(Debug, Clone)]
pub struct Grid {
    size: u32,
    cells: Vec<CellState>,
    robots: Vec<Robot>,
    monsters: Vec<Monster>,
    next_robot_id: u32,
    next_monster_id: u32,
}

/// Largest supported edge length. 256³ one-byte cells is 16 MiB, and every
/// coordinate stays well inside `i32`.
pub const MAX_SIZE: u32 = 256;

/// Cells in an NxNxN cube, `None` if the count does not fit in `usize`
pub fn cube_cell_count(size: u32) -> Option<usize> {
    let n = usize::try_from(size).ok()?;
    n.checked_mul(n)?.checked_mul(n)
}

impl Grid {
    /// All cells Free, no entities
    ///
    /// `size` is clamped to `MAX_SIZE`; configs larger than that are
    /// rejected by validation before a grid is ever built.
    pub fn new(size: u32) -> Self {
        let size = size.min(MAX_SIZE);
        let cell_count = cube_cell_count(size).unwrap_or(0);
        Self {
            size,
            cells: vec![CellState::Free; cell_count],
            robots: Vec::new(),
            monsters: Vec::new(),
            next_robot_id: 0,
            next_monster_id: 0,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let n = self.size as i32;
        (0..n).contains(&pos.x) && (0..n).contains(&pos.y) && (0..n).contains(&pos.z)
    }

    #[inline]
    fn index(&self, pos: Position) -> Option<usize> {
        if !self.is_in_bounds(pos) {
            return None;
        }
        let n = self.size as usize;
        Some((pos.x as usize * n + pos.y as usize) * n + pos.z as usize)
    }

    /// Inverse of the internal cell index
    pub fn position_of(&self, index: usize) -> Option<Position> {
        if index >= self.cells.len() {
            return None;
        }
        let n = self.size as usize;
        Some(Position::new(
            (index / (n * n)) as i32,
            ((index / n) % n) as i32,
            (index % n) as i32,
        ))
    }

    /// Every in-bounds coordinate, in index order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).filter_map(move |i| self.position_of(i))
    }

    /// Cell state, or `CellState::Invalid` when out of bounds
    #[inline]
    pub fn state_at(&self, pos: Position) -> CellState {
        self.index(pos)
            .map(|i| self.cells[i])
            .unwrap_or(CellState::Invalid)
    }

    /// Raw terrain write used by world generation
    pub(crate) fn set_terrain(&mut self, pos: Position, blocked: bool) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = if blocked {
                CellState::Blocked
            } else {
                CellState::Free
            };
        }
    }

    /// Permanently block a cell. Fails if out of bounds or anything stands on it.
    pub fn block_cell(&mut self, pos: Position) -> bool {
        if self.robot_at(pos).is_some() || self.monster_at(pos).is_some() {
            return false;
        }
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = CellState::Blocked;
                true
            }
            None => false,
        }
    }

    // === PLACEMENT ===

    /// Place a robot on a Free cell, assigning its id and position
    pub fn place_robot(&mut self, mut robot: Robot, pos: Position) -> Option<RobotId> {
        if !self.state_at(pos).is_free() {
            return None;
        }
        let id = RobotId(self.next_robot_id);
        self.next_robot_id += 1;

        robot.id = id;
        robot.position = pos;
        self.robots.push(robot);
        self.refresh_cell(pos);
        Some(id)
    }

    /// Place a monster on a Free cell, assigning its id and position
    pub fn place_monster(&mut self, mut monster: Monster, pos: Position) -> Option<MonsterId> {
        if !self.state_at(pos).is_free() {
            return None;
        }
        let id = MonsterId(self.next_monster_id);
        self.next_monster_id += 1;

        monster.id = id;
        monster.position = pos;
        self.monsters.push(monster);
        self.refresh_cell(pos);
        Some(id)
    }

    pub fn spawn_robot(&mut self, pos: Position, orientation: Direction) -> Option<RobotId> {
        self.place_robot(Robot::new(pos, orientation), pos)
    }

    pub fn spawn_monster(&mut self, pos: Position, move_period: u32) -> Option<MonsterId> {
        self.place_monster(Monster::with_period(pos, move_period), pos)
    }

    // === MOVEMENT ===

    /// Move an entity onto a Free cell
    ///
    /// Fails for out-of-bounds or non-Free targets and for unknown entities.
    /// Touches nothing but the two cells and the stored position.
    pub fn move_entity(&mut self, entity: EntityRef, new_pos: Position) -> bool {
        if !self.state_at(new_pos).is_free() {
            return false;
        }
        self.relocate(entity, new_pos)
    }

    /// Hunting step: like `move_entity` but a MonsterOccupied target is accepted
    ///
    /// The robot then shares the monster's cell, which stays MonsterOccupied.
    /// A monster cell already shared with another robot is refused.
    pub fn advance_onto(&mut self, robot: RobotId, new_pos: Position) -> bool {
        match self.state_at(new_pos) {
            CellState::Free => self.relocate(EntityRef::Robot(robot), new_pos),
            CellState::MonsterOccupied if self.robot_at(new_pos).is_none() => {
                self.relocate(EntityRef::Robot(robot), new_pos)
            }
            _ => false,
        }
    }

    fn relocate(&mut self, entity: EntityRef, new_pos: Position) -> bool {
        let old_pos = match entity {
            EntityRef::Robot(id) => match self.robots.iter_mut().find(|r| r.id == id) {
                Some(robot) => std::mem::replace(&mut robot.position, new_pos),
                None => return false,
            },
            EntityRef::Monster(id) => match self.monsters.iter_mut().find(|m| m.id == id) {
                Some(monster) => std::mem::replace(&mut monster.position, new_pos),
                None => return false,
            },
        };
        self.refresh_cell(old_pos);
        self.refresh_cell(new_pos);
        true
    }

    /// Take an entity out of its registry and vacate its cell
    pub fn remove(&mut self, entity: EntityRef) -> Option<Removed> {
        let removed = match entity {
            EntityRef::Robot(id) => {
                let idx = self.robots.iter().position(|r| r.id == id)?;
                Removed::Robot(self.robots.remove(idx))
            }
            EntityRef::Monster(id) => {
                let idx = self.monsters.iter().position(|m| m.id == id)?;
                Removed::Monster(self.monsters.remove(idx))
            }
        };
        let pos = match &removed {
            Removed::Robot(r) => r.position,
            Removed::Monster(m) => m.position,
        };
        self.refresh_cell(pos);
        Some(removed)
    }

    /// Recompute an unblocked cell's state from its occupants
    fn refresh_cell(&mut self, pos: Position) {
        let Some(i) = self.index(pos) else { return };
        if self.cells[i] == CellState::Blocked {
            return;
        }
        // A monster dominates a shared cell
        let occupant = if self.monsters.iter().any(|m| m.position == pos) {
            Some(EntityKind::Monster)
        } else if self.robots.iter().any(|r| r.position == pos) {
            Some(EntityKind::Robot)
        } else {
            None
        };
        self.cells[i] = occupant.map_or(CellState::Free, CellState::from);
    }

    // === REGISTRY QUERIES ===

    /// Live robots in insertion order
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Live monsters in insertion order
    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.iter().find(|r| r.id == id)
    }

    pub(crate) fn robot_mut(&mut self, id: RobotId) -> Option<&mut Robot> {
        self.robots.iter_mut().find(|r| r.id == id)
    }

    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.id == id)
    }

    pub fn robot_at(&self, pos: Position) -> Option<&Robot> {
        self.robots.iter().find(|r| r.position == pos)
    }

    pub fn monster_at(&self, pos: Position) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.position == pos)
    }

    /// Snapshot of live robot ids
    pub fn robot_ids(&self) -> Vec<RobotId> {
        self.robots.iter().map(|r| r.id).collect()
    }

    /// Snapshot of live monster ids
    pub fn monster_ids(&self) -> Vec<MonsterId> {
        self.monsters.iter().map(|m| m.id).collect()
    }

    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }

    pub fn has_entities(&self) -> bool {
        !self.robots.is_empty() || !self.monsters.is_empty()
    }

    // === INTROSPECTION ===

    /// Number of cells currently in `state`
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats {
            size: self.size,
            robots: self.robots.len(),
            monsters: self.monsters.len(),
            ..Default::default()
        };
        for cell in &self.cells {
            match cell {
                CellState::Free => stats.free += 1,
                CellState::Blocked => stats.blocked += 1,
                CellState::RobotOccupied => stats.robot_cells += 1,
                CellState::MonsterOccupied => stats.monster_cells += 1,
                CellState::Invalid => {}
            }
        }
        stats
    }

    /// Check that cell states and registry positions agree
    ///
    /// Every entity stands on an in-bounds, unblocked cell; each cell state
    /// matches what its occupants imply; no two robots or two monsters
    /// share a cell.
    pub fn occupancy_consistent(&self) -> bool {
        for (i, robot) in self.robots.iter().enumerate() {
            if !self.is_in_bounds(robot.position)
                || self.robots[i + 1..].iter().any(|o| o.position == robot.position)
            {
                return false;
            }
        }
        for (i, monster) in self.monsters.iter().enumerate() {
            if !self.is_in_bounds(monster.position)
                || self.monsters[i + 1..].iter().any(|o| o.position == monster.position)
            {
                return false;
            }
        }

        self.positions().all(|pos| {
            let has_monster = self.monster_at(pos).is_some();
            let has_robot = self.robot_at(pos).is_some();
            match self.state_at(pos) {
                CellState::Free => !has_monster && !has_robot,
                CellState::Blocked => !has_monster && !has_robot,
                CellState::RobotOccupied => has_robot && !has_monster,
                CellState::MonsterOccupied => has_monster,
                CellState::Invalid => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn test_bounds_and_invalid_sentinel() {
        let grid = Grid::new(3);
        assert!(grid.is_in_bounds(IVec3::new(0, 0, 0)));
        assert!(grid.is_in_bounds(IVec3::new(2, 2, 2)));
        assert!(!grid.is_in_bounds(IVec3::new(3, 0, 0)));
        assert!(!grid.is_in_bounds(IVec3::new(0, -1, 0)));
        assert_eq!(grid.state_at(IVec3::new(0, 0, 3)), CellState::Invalid);
        assert_eq!(grid.state_at(IVec3::new(1, 1, 1)), CellState::Free);
    }

    #[test]
    fn test_oversized_grid_is_clamped() {
        let grid = Grid::new(MAX_SIZE + 1);
        assert_eq!(grid.size(), MAX_SIZE);
        assert_eq!(Some(grid.cell_count()), cube_cell_count(MAX_SIZE));
        assert!(grid.is_in_bounds(IVec3::splat(MAX_SIZE as i32 - 1)));
        assert!(!grid.is_in_bounds(IVec3::splat(MAX_SIZE as i32)));
    }

    #[test]
    fn test_cube_cell_count_overflow() {
        assert_eq!(cube_cell_count(4), Some(64));
        assert_eq!(cube_cell_count(0), Some(0));
        if usize::BITS == 64 {
            assert_eq!(cube_cell_count(3_000_000), None);
        }
    }

    #[test]
    fn test_position_index_round_trip() {
        let grid = Grid::new(4);
        for (i, pos) in grid.positions().enumerate() {
            assert_eq!(grid.index(pos), Some(i));
        }
        assert_eq!(grid.positions().count(), 64);
        assert_eq!(grid.position_of(64), None);
    }

    #[test]
    fn test_place_sets_state_and_position() {
        let mut grid = Grid::new(3);
        let pos = IVec3::new(1, 2, 0);
        let id = grid.spawn_robot(pos, Direction::PosX).expect("free cell");

        assert_eq!(grid.state_at(pos), CellState::RobotOccupied);
        assert_eq!(grid.robot(id).map(|r| r.position()), Some(pos));
        assert!(grid.occupancy_consistent());
    }

    #[test]
    fn test_place_rejects_occupied_blocked_and_out_of_bounds() {
        let mut grid = Grid::new(3);
        let pos = IVec3::new(0, 0, 0);
        grid.spawn_monster(pos, 3).expect("free cell");
        grid.set_terrain(IVec3::new(1, 0, 0), true);

        assert!(grid.spawn_robot(pos, Direction::PosX).is_none());
        assert!(grid.spawn_robot(IVec3::new(1, 0, 0), Direction::PosX).is_none());
        assert!(grid.spawn_robot(IVec3::new(-1, 0, 0), Direction::PosX).is_none());
        assert_eq!(grid.robot_count(), 0);
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut grid = Grid::new(3);
        let a = grid.spawn_robot(IVec3::new(0, 0, 0), Direction::PosX).unwrap();
        let b = grid.spawn_robot(IVec3::new(1, 0, 0), Direction::PosX).unwrap();
        assert_eq!(grid.robot_ids(), vec![a, b]);
        assert!(a < b);
    }

    #[test]
    fn test_move_frees_old_cell() {
        let mut grid = Grid::new(3);
        let from = IVec3::new(0, 0, 0);
        let to = IVec3::new(0, 1, 0);
        let id = grid.spawn_monster(from, 3).unwrap();

        assert!(grid.move_entity(EntityRef::Monster(id), to));
        assert_eq!(grid.state_at(from), CellState::Free);
        assert_eq!(grid.state_at(to), CellState::MonsterOccupied);
        assert_eq!(grid.monster(id).map(|m| m.position()), Some(to));
    }

    #[test]
    fn test_move_rejects_non_free_targets() {
        let mut grid = Grid::new(3);
        let robot = grid.spawn_robot(IVec3::new(0, 0, 0), Direction::PosX).unwrap();
        grid.spawn_monster(IVec3::new(1, 0, 0), 3).unwrap();
        grid.set_terrain(IVec3::new(0, 1, 0), true);

        assert!(!grid.move_entity(robot.into(), IVec3::new(1, 0, 0)));
        assert!(!grid.move_entity(robot.into(), IVec3::new(0, 1, 0)));
        assert!(!grid.move_entity(robot.into(), IVec3::new(-1, 0, 0)));
        assert_eq!(grid.robot(robot).map(|r| r.position()), Some(IVec3::ZERO));
    }

    #[test]
    fn test_move_unknown_entity_fails() {
        let mut grid = Grid::new(3);
        assert!(!grid.move_entity(EntityRef::Robot(RobotId(9)), IVec3::new(1, 1, 1)));
    }

    #[test]
    fn test_advance_onto_monster_shares_cell() {
        let mut grid = Grid::new(3);
        let robot = grid.spawn_robot(IVec3::new(0, 0, 0), Direction::PosX).unwrap();
        let monster = grid.spawn_monster(IVec3::new(1, 0, 0), 3).unwrap();

        assert!(grid.advance_onto(robot, IVec3::new(1, 0, 0)));
        assert_eq!(grid.state_at(IVec3::new(0, 0, 0)), CellState::Free);
        assert_eq!(grid.state_at(IVec3::new(1, 0, 0)), CellState::MonsterOccupied);
        assert!(grid.occupancy_consistent());

        // Monster leaves: the robot is uncovered
        assert!(grid.move_entity(monster.into(), IVec3::new(2, 0, 0)));
        assert_eq!(grid.state_at(IVec3::new(1, 0, 0)), CellState::RobotOccupied);
        assert!(grid.occupancy_consistent());
    }

    #[test]
    fn test_advance_onto_rejects_robots_and_walls() {
        let mut grid = Grid::new(3);
        let robot = grid.spawn_robot(IVec3::new(0, 0, 0), Direction::PosX).unwrap();
        grid.spawn_robot(IVec3::new(1, 0, 0), Direction::PosX).unwrap();
        grid.set_terrain(IVec3::new(0, 1, 0), true);

        assert!(!grid.advance_onto(robot, IVec3::new(1, 0, 0)));
        assert!(!grid.advance_onto(robot, IVec3::new(0, 1, 0)));
        assert!(!grid.advance_onto(robot, IVec3::new(0, 0, -1)));
    }

    #[test]
    fn test_advance_onto_shared_monster_cell_rejected() {
        let mut grid = Grid::new(3);
        let first = grid.spawn_robot(IVec3::new(0, 0, 0), Direction::PosX).unwrap();
        let second = grid.spawn_robot(IVec3::new(2, 0, 0), Direction::NegX).unwrap();
        grid.spawn_monster(IVec3::new(1, 0, 0), 3).unwrap();

        assert!(grid.advance_onto(first, IVec3::new(1, 0, 0)));
        assert!(!grid.advance_onto(second, IVec3::new(1, 0, 0)));
        assert!(grid.occupancy_consistent());
    }

    #[test]
    fn test_remove_frees_cell() {
        let mut grid = Grid::new(3);
        let pos = IVec3::new(2, 2, 2);
        let id = grid.spawn_monster(pos, 3).unwrap();

        let removed = grid.remove(id.into());
        assert!(matches!(removed, Some(Removed::Monster(m)) if m.position() == pos));
        assert_eq!(grid.state_at(pos), CellState::Free);
        assert_eq!(grid.monster_count(), 0);
        assert!(grid.remove(id.into()).is_none());
    }

    #[test]
    fn test_block_cell_requires_empty_cell() {
        let mut grid = Grid::new(3);
        grid.spawn_monster(IVec3::new(0, 0, 0), 3).unwrap();
        assert!(!grid.block_cell(IVec3::new(0, 0, 0)));
        assert!(grid.block_cell(IVec3::new(1, 1, 1)));
        assert_eq!(grid.state_at(IVec3::new(1, 1, 1)), CellState::Blocked);
        assert!(!grid.block_cell(IVec3::new(5, 5, 5)));
    }

    #[test]
    fn test_stats_counts_every_cell() {
        let mut grid = Grid::new(2);
        grid.set_terrain(IVec3::new(0, 0, 0), true);
        grid.spawn_robot(IVec3::new(1, 0, 0), Direction::PosX).unwrap();
        grid.spawn_monster(IVec3::new(0, 1, 0), 3).unwrap();

        let stats = grid.stats();
        assert_eq!(stats.blocked, 1);
        assert_eq!(stats.robot_cells, 1);
        assert_eq!(stats.monster_cells, 1);
        assert_eq!(stats.free, 5);
        assert_eq!(stats.free + stats.blocked + stats.robot_cells + stats.monster_cells, 8);
    }
}
