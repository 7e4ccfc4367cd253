use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::types::Turn;
use crate::simulation::action_select::RobotAction;
use crate::simulation::perception::Perception;

/// Default number of entries a robot remembers
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// One remembered decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub turn: Turn,
    pub perception: Perception,
    pub action: RobotAction,
}

/// Bounded FIFO of a robot's past decisions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    entries: VecDeque<MemoryEntry>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: MemoryEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front(); // Remove oldest
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&MemoryEntry> {
        self.entries.back()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.entries.iter()
    }

    /// Most recent entry whose sensor flags match `perception`, looking back
    /// strictly fewer than `window` turns from `now`
    ///
    /// Nothing in the decision policy consumes the result.
    pub fn recall(&self, perception: &Perception, now: Turn, window: u64) -> Option<&MemoryEntry> {
        self.entries.iter().rev().find(|entry| {
            now.saturating_sub(entry.turn) < window && entry.perception.flags() == perception.flags()
        })
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
