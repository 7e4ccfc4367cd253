//! Run output and serialization

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{MonsterId, Position, RobotId, Turn};
use crate::world::grid::{Grid, GridStats};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every monster eliminated
    Victory,
    /// Every robot eliminated
    Defeat,
    /// Turn limit reached with both sides alive
    TimeLimit,
    /// Stopped externally between turns
    Interrupted,
}

impl RunOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::Victory => "victory",
            RunOutcome::Defeat => "defeat",
            RunOutcome::TimeLimit => "time limit",
            RunOutcome::Interrupted => "interrupted",
        }
    }
}

/// One mutual destruction, as recorded in the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnihilationRecord {
    pub turn: Turn,
    pub robot: RobotId,
    pub monster: MonsterId,
    pub cell: Position,
}

/// Complete result of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Seed the RNG was built from; replaying it reproduces the run
    pub seed: u64,
    pub outcome: RunOutcome,
    pub turns_played: Turn,
    pub robots_at_start: usize,
    pub monsters_at_start: usize,
    pub robots_remaining: usize,
    pub monsters_remaining: usize,
    pub final_stats: GridStats,
    pub annihilations: Vec<AnnihilationRecord>,
    pub simulation_time_ms: u64,
}

impl RunSummary {
    /// `at_start` is the (robots, monsters) population after setup
    pub fn new(
        seed: u64,
        outcome: RunOutcome,
        turns_played: Turn,
        at_start: (usize, usize),
        grid: &Grid,
        annihilations: Vec<AnnihilationRecord>,
        elapsed: Duration,
    ) -> Self {
        Self {
            seed,
            outcome,
            turns_played,
            robots_at_start: at_start.0,
            monsters_at_start: at_start.1,
            robots_remaining: grid.robot_count(),
            monsters_remaining: grid.monster_count(),
            final_stats: grid.stats(),
            annihilations,
            simulation_time_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> String {
        format!(
            "Run ended in {} after {} turns ({}ms, seed {})\n{} annihilations, {}/{} robots and {}/{} monsters remain, {} cells blocked",
            self.outcome.label(),
            self.turns_played,
            self.simulation_time_ms,
            self.seed,
            self.annihilations.len(),
            self.robots_remaining,
            self.robots_at_start,
            self.monsters_remaining,
            self.monsters_at_start,
            self.final_stats.blocked,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Direction;
    use glam::IVec3;

    #[test]
    fn test_summary_and_json() {
        let mut grid = Grid::new(2);
        grid.spawn_robot(IVec3::ZERO, Direction::PosX).unwrap();
        let summary = RunSummary::new(
            42,
            RunOutcome::Victory,
            7,
            (1, 1),
            &grid,
            vec![AnnihilationRecord {
                turn: 6,
                robot: RobotId(1),
                monster: MonsterId(0),
                cell: IVec3::new(1, 1, 1),
            }],
            Duration::from_millis(12),
        );

        let text = summary.summary();
        assert!(text.contains("victory"));
        assert!(text.contains("seed 42"));

        let json = summary.to_json().unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.outcome, RunOutcome::Victory);
        assert_eq!(back.robots_remaining, 1);
        assert_eq!(back.annihilations.len(), 1);
    }
}
