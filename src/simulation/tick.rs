//! Tick system - orchestrates simulation turns
//!
//! One turn is two phases: every live robot acts in registry order, then
//! every live monster. Both phases iterate over an id snapshot taken at the
//! start of the phase and skip ids that disappeared mid-phase. Victory and
//! defeat are evaluated only once both phases are done.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{Direction, MonsterId, Position, RobotId, Turn};
use crate::entity::robot::Robot;
use crate::simulation::action_execute::take_turn;
use crate::simulation::action_select::{RobotAction, Rule};
use crate::simulation::output::{AnnihilationRecord, RunOutcome, RunSummary};
use crate::simulation::wander::{wander, WanderOutcome};
use crate::world::generation::{generate, random_direction, random_free_cells};
use crate::world::grid::Grid;

/// Events generated during a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationEvent {
    /// A robot completed its decision
    RobotActed {
        turn: Turn,
        robot: RobotId,
        rule: Rule,
        action: RobotAction,
        position: Position,
        orientation: Direction,
    },
    /// A robot destroyed a monster and itself; the cell is now Blocked
    Annihilated {
        turn: Turn,
        robot: RobotId,
        monster: MonsterId,
        cell: Position,
    },
    MonsterMoved {
        turn: Turn,
        monster: MonsterId,
        from: Position,
        to: Position,
    },
    /// Acting turn, but the sampled cell was not Free
    MonsterStayed { turn: Turn, monster: MonsterId },
}

/// Game state after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStatus {
    Continue,
    /// No monsters remain
    Victory,
    /// No robots remain
    Defeat,
}

/// Everything one call to `advance` produced
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub turn: Turn,
    pub events: Vec<SimulationEvent>,
    pub status: TurnStatus,
}

/// The world plus the RNG that drives it
pub struct Simulation {
    grid: Grid,
    rng: ChaCha8Rng,
    config: SimulationConfig,
    seed: u64,
    population_at_start: (usize, usize),
    annihilations: Vec<AnnihilationRecord>,
    fallen: Vec<Robot>,
}

impl Simulation {
    /// Validate the config, generate the world and place the population
    ///
    /// With no configured seed one is drawn from entropy and kept so the run
    /// can be replayed.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.world.seed.unwrap_or_else(rand::random::<u64>);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = generate(&config.world, &mut rng);

        let mut sim = Self::from_parts(grid, rng, config, seed);
        sim.populate();
        Ok(sim)
    }

    /// Wrap a prepared grid, entities included, without placing anything
    pub fn with_grid(grid: Grid, config: SimulationConfig, seed: u64) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Self::from_parts(grid, rng, config, seed)
    }

    fn from_parts(grid: Grid, rng: ChaCha8Rng, config: SimulationConfig, seed: u64) -> Self {
        let population_at_start = (grid.robot_count(), grid.monster_count());
        Self {
            grid,
            rng,
            config,
            seed,
            population_at_start,
            annihilations: Vec::new(),
            fallen: Vec::new(),
        }
    }

    /// Place the configured robots then monsters on random Free cells
    ///
    /// An exhausted free-cell search places fewer entities; it is logged
    /// but not an error. Returns how many of each were placed.
    pub fn populate(&mut self) -> (usize, usize) {
        let attempts = self.config.world.max_probe_attempts;
        let wanted_robots = self.config.population.robots as usize;
        let wanted_monsters = self.config.population.monsters as usize;

        let mut robots = 0;
        for pos in random_free_cells(&self.grid, &mut self.rng, wanted_robots, attempts) {
            let orientation = random_direction(&mut self.rng);
            let robot = Robot::with_history_capacity(pos, orientation, self.config.behavior.history_capacity);
            if self.grid.place_robot(robot, pos).is_some() {
                robots += 1;
            }
        }

        let mut monsters = 0;
        for pos in random_free_cells(&self.grid, &mut self.rng, wanted_monsters, attempts) {
            if self
                .grid
                .spawn_monster(pos, self.config.behavior.monster_move_period)
                .is_some()
            {
                monsters += 1;
            }
        }

        if robots < wanted_robots || monsters < wanted_monsters {
            tracing::warn!(
                robots,
                wanted_robots,
                monsters,
                wanted_monsters,
                "Free-cell search exhausted, placed fewer entities"
            );
        }
        tracing::info!(robots, monsters, seed = self.seed, "Population placed");

        self.population_at_start = (self.grid.robot_count(), self.grid.monster_count());
        (robots, monsters)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn annihilations(&self) -> &[AnnihilationRecord] {
        &self.annihilations
    }

    /// Destroyed robots, with their full history
    pub fn fallen_robots(&self) -> &[Robot] {
        &self.fallen
    }

    /// Victory is checked before defeat
    pub fn status(&self) -> TurnStatus {
        if self.grid.monster_count() == 0 {
            TurnStatus::Victory
        } else if self.grid.robot_count() == 0 {
            TurnStatus::Defeat
        } else {
            TurnStatus::Continue
        }
    }

    /// Run one turn: robots phase, monsters phase, then the end check
    pub fn advance(&mut self, turn: Turn) -> TurnReport {
        let mut events = Vec::new();
        let recall_window = self.config.behavior.recall_window;

        for id in self.grid.robot_ids() {
            let Some(outcome) = take_turn(&mut self.grid, id, turn, recall_window) else {
                continue;
            };

            events.push(SimulationEvent::RobotActed {
                turn,
                robot: id,
                rule: outcome.rule,
                action: outcome.action,
                position: outcome.position,
                orientation: outcome.orientation,
            });

            if let Some(result) = outcome.annihilation {
                let record = AnnihilationRecord {
                    turn,
                    robot: result.robot.id(),
                    monster: result.monster.id(),
                    cell: result.cell,
                };
                tracing::info!(turn, robot = ?record.robot, monster = ?record.monster, cell = ?record.cell, "Annihilation");
                events.push(SimulationEvent::Annihilated {
                    turn,
                    robot: record.robot,
                    monster: record.monster,
                    cell: record.cell,
                });
                self.annihilations.push(record);
                self.fallen.push(result.robot);
            }
        }

        for id in self.grid.monster_ids() {
            match wander(&mut self.grid, id, turn, &mut self.rng) {
                Some(WanderOutcome::Moved { from, to }) => events.push(SimulationEvent::MonsterMoved {
                    turn,
                    monster: id,
                    from,
                    to,
                }),
                Some(WanderOutcome::Stayed) => events.push(SimulationEvent::MonsterStayed { turn, monster: id }),
                Some(WanderOutcome::Resting) | None => {}
            }
        }

        TurnReport {
            turn,
            events,
            status: self.status(),
        }
    }

    /// Drive turns from 0 until a side is wiped out, the limit is hit, or
    /// `should_stop` asks to stop
    ///
    /// `should_stop` is polled before each turn with that turn's number.
    pub fn run<F>(&mut self, max_turns: Turn, mut should_stop: F) -> RunSummary
    where
        F: FnMut(Turn) -> bool,
    {
        let start = Instant::now();
        tracing::info!(
            max_turns,
            robots = self.grid.robot_count(),
            monsters = self.grid.monster_count(),
            "Starting run"
        );

        let mut turn: Turn = 0;
        let outcome = loop {
            match self.status() {
                TurnStatus::Victory => break RunOutcome::Victory,
                TurnStatus::Defeat => break RunOutcome::Defeat,
                TurnStatus::Continue => {}
            }
            if turn >= max_turns {
                break RunOutcome::TimeLimit;
            }
            if should_stop(turn) {
                break RunOutcome::Interrupted;
            }

            let report = self.advance(turn);
            tracing::debug!(turn, events = report.events.len(), status = ?report.status, "Turn complete");
            turn += 1;
        };

        let summary = self.summarize(outcome, turn, start.elapsed());
        tracing::info!(outcome = outcome.label(), turns = turn, "Run finished");
        summary
    }

    /// Build the summary for a run driven externally through `advance`
    pub fn summarize(&self, outcome: RunOutcome, turns_played: Turn, elapsed: Duration) -> RunSummary {
        RunSummary::new(
            self.seed,
            outcome,
            turns_played,
            self.population_at_start,
            &self.grid,
            self.annihilations.clone(),
            elapsed,
        )
    }
}
