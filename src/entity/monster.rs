use serde::{Deserialize, Serialize};

use crate::core::types::{MonsterId, Position, Turn};

/// Default move period: monsters act every third turn
pub const DEFAULT_MOVE_PERIOD: u32 = 3;

/// A hazard that drifts randomly every K turns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub(crate) id: MonsterId,
    pub(crate) position: Position,
    move_period: u32,
}

impl Monster {
    pub fn new(position: Position) -> Self {
        Self::with_period(position, DEFAULT_MOVE_PERIOD)
    }

    /// A zero period is clamped to 1 (act every turn)
    pub fn with_period(position: Position, move_period: u32) -> Self {
        Self {
            id: MonsterId(0),
            position,
            move_period: move_period.max(1),
        }
    }

    pub fn id(&self) -> MonsterId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn move_period(&self) -> u32 {
        self.move_period
    }

    /// True on turns where `turn % K == 0`
    pub fn acts_on(&self, turn: Turn) -> bool {
        turn % self.move_period as u64 == 0
    }
}
