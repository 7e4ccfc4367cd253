//! Turn-based simulation: sensing, deciding, acting and the turn loop

pub mod action_execute;
pub mod action_select;
pub mod output;
pub mod perception;
pub mod tick;
pub mod wander;

pub use action_execute::{destroy, take_turn, Annihilation, AttackRejected, RobotTurn};
pub use action_select::{select_rule, RobotAction, Rule};
pub use output::{AnnihilationRecord, RunOutcome, RunSummary};
pub use perception::{Perception, SensorFlags};
pub use tick::{Simulation, SimulationEvent, TurnReport, TurnStatus};
pub use wander::{wander, WanderOutcome};
