//! Perception system - what a robot's sensors report this turn
//!
//! All sensors are pure reads of the grid. A fresh `Perception` is built
//! every decision.

use serde::{Deserialize, Serialize};

use crate::core::types::{Direction, Position};
use crate::entity::robot::Robot;
use crate::world::grid::{CellState, Grid};

/// Snapshot of every sensor reading for one decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Perception {
    /// Gyroscope: current facing
    pub orientation: Direction,
    /// Monster within the two-cell cardinal neighbourhood (not straight behind)
    pub monster_nearby: bool,
    /// Monster sharing the robot's own cell
    pub monster_here: bool,
    /// Another robot directly in front
    pub robot_ahead: bool,
    /// Last turn's forward move hit something
    pub hit_wall: bool,
}

/// The four boolean sensor flags, used for history similarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SensorFlags {
    pub monster_nearby: bool,
    pub monster_here: bool,
    pub robot_ahead: bool,
    pub hit_wall: bool,
}

impl Perception {
    /// Read every sensor for `robot`
    pub fn sense(grid: &Grid, robot: &Robot) -> Self {
        Self {
            orientation: robot.orientation(),
            monster_nearby: monster_nearby(grid, robot.position(), robot.orientation()),
            monster_here: monster_here(grid, robot.position()),
            robot_ahead: robot_ahead(grid, robot.position(), robot.orientation()),
            hit_wall: robot.hit_wall_last_turn(),
        }
    }

    pub fn flags(&self) -> SensorFlags {
        SensorFlags {
            monster_nearby: self.monster_nearby,
            monster_here: self.monster_here,
            robot_ahead: self.robot_ahead,
            hit_wall: self.hit_wall,
        }
    }
}

/// Monster scan over the five neighbours that are not directly behind
///
/// A monster irradiates its six neighbours, so a neighbour cell counts if
/// it holds a monster itself or touches one.
pub fn monster_nearby(grid: &Grid, position: Position, orientation: Direction) -> bool {
    let behind = orientation.opposite();

    Direction::ALL
        .iter()
        .filter(|&&dir| dir != behind)
        .map(|dir| position + dir.to_vec())
        .filter(|&neighbour| grid.is_in_bounds(neighbour))
        .any(|neighbour| {
            grid.state_at(neighbour) == CellState::MonsterOccupied
                || Direction::ALL
                    .iter()
                    .any(|d| grid.state_at(neighbour + d.to_vec()) == CellState::MonsterOccupied)
        })
}

/// Spectral sensor: the robot's own cell is MonsterOccupied
pub fn monster_here(grid: &Grid, position: Position) -> bool {
    grid.state_at(position) == CellState::MonsterOccupied
}

/// The cell in front holds a robot
pub fn robot_ahead(grid: &Grid, position: Position, orientation: Direction) -> bool {
    grid.state_at(position + orientation.to_vec()) == CellState::RobotOccupied
}
