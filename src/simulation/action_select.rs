//! Action selection - the robot's priority rule cascade
//!
//! Rules are evaluated in strict order and the first one whose trigger holds
//! wins:
//! 1. Attack when a monster shares the robot's cell
//! 2. Hunt when a monster is sensed nearby
//! 3. Yield when another robot blocks the way
//! 4. Recover after bumping into something last turn
//! 5. Explore otherwise

use serde::{Deserialize, Serialize};

use crate::simulation::action_execute::AttackRejected;
use crate::simulation::perception::Perception;

/// Which rule fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    Attack,
    Hunt,
    Yield,
    Recover,
    Explore,
}

/// What the robot actually did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotAction {
    /// Destroy effector fired; robot and monster annihilated
    Destroy,
    /// Destroy effector refused by a failed precondition
    AttackAborted(AttackRejected),
    /// Stepped one cell
    Move,
    /// Turned to face the hunting direction
    Reorient,
    /// Quarter-turn about a global axis
    Rotate,
}

impl RobotAction {
    pub fn name(&self) -> &'static str {
        match self {
            RobotAction::Destroy => "destroy",
            RobotAction::AttackAborted(_) => "attack_aborted",
            RobotAction::Move => "move",
            RobotAction::Reorient => "reorient",
            RobotAction::Rotate => "rotate",
        }
    }
}

impl std::fmt::Display for RobotAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pick the rule for this turn
pub fn select_rule(perception: &Perception) -> Rule {
    if perception.monster_here {
        Rule::Attack
    } else if perception.monster_nearby {
        Rule::Hunt
    } else if perception.robot_ahead {
        Rule::Yield
    } else if perception.hit_wall {
        Rule::Recover
    } else {
        Rule::Explore
    }
}
