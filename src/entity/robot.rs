//! Robot record - position, facing, wall memory and decision history

use serde::{Deserialize, Serialize};

use crate::core::types::{Angle, Axis, Direction, Position, RobotId, Turn};
use crate::entity::memory::{History, MemoryEntry};
use crate::simulation::action_select::RobotAction;
use crate::simulation::perception::Perception;

/// A reactive hunter
///
/// Position and id are owned by the grid: they are assigned on placement
/// and only change through grid operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    pub(crate) id: RobotId,
    pub(crate) position: Position,
    orientation: Direction,
    hit_wall_last_turn: bool,
    history: History,
    pub(crate) destroyed: bool,
}

impl Robot {
    pub fn new(position: Position, orientation: Direction) -> Self {
        Self::with_history_capacity(position, orientation, crate::entity::memory::DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(position: Position, orientation: Direction, capacity: usize) -> Self {
        Self {
            id: RobotId(0),
            position,
            orientation,
            hit_wall_last_turn: false,
            history: History::new(capacity),
            destroyed: false,
        }
    }

    pub fn id(&self) -> RobotId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn orientation(&self) -> Direction {
        self.orientation
    }

    /// Cell directly in front
    pub fn ahead(&self) -> Position {
        self.position + self.orientation.to_vec()
    }

    pub fn hit_wall_last_turn(&self) -> bool {
        self.hit_wall_last_turn
    }

    pub(crate) fn set_hit_wall(&mut self, hit: bool) {
        self.hit_wall_last_turn = hit;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn rotate(&mut self, axis: Axis, angle: Angle) {
        self.orientation = self.orientation.rotated(axis, angle);
    }

    /// Turn to face `direction` directly
    pub fn face(&mut self, direction: Direction) {
        self.orientation = direction;
    }

    pub fn remember(&mut self, turn: Turn, perception: Perception, action: RobotAction) {
        self.history.push(MemoryEntry {
            turn,
            perception,
            action,
        });
    }
}
