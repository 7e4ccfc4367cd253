//! Action execution - robot effectors and the full robot turn
//!
//! A robot turn is sense -> select rule -> apply effector -> remember.
//! Every effector failure is an ordinary outcome, never an error that
//! escapes the turn.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{manhattan, Angle, Axis, Direction, Position, RobotId, Turn};
use crate::entity::monster::Monster;
use crate::entity::robot::Robot;
use crate::simulation::action_select::{select_rule, RobotAction, Rule};
use crate::simulation::perception::{self, Perception};
use crate::world::grid::{CellState, Grid, Removed};

/// Why the destroy effector refused to fire
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackRejected {
    #[error("robot {0:?} is not registered")]
    UnknownRobot(RobotId),

    #[error("robot is already destroyed")]
    AlreadyDestroyed,

    #[error("no monster in the robot's cell")]
    NoMonsterHere,

    #[error("robot position is out of bounds")]
    OutOfBounds,

    #[error("no registered monster stands on the robot's cell")]
    MonsterNotRegistered,
}

/// Result of a successful destroy: both records, taken out of the world
#[derive(Debug, Clone)]
pub struct Annihilation {
    /// The robot, marked destroyed
    pub robot: Robot,
    pub monster: Monster,
    /// Now permanently Blocked
    pub cell: Position,
}

/// Everything that happened during one robot's turn
#[derive(Debug, Clone)]
pub struct RobotTurn {
    pub robot: RobotId,
    pub rule: Rule,
    pub perception: Perception,
    pub action: RobotAction,
    /// Position and facing after acting (the annihilated cell for Destroy)
    pub position: Position,
    pub orientation: Direction,
    pub annihilation: Option<Annihilation>,
}

/// Destroy effector: annihilate the robot together with the monster in its cell
///
/// Preconditions are checked in order; the first failure aborts with no
/// mutation. On success both leave their registries and the cell becomes
/// Blocked for good.
pub fn destroy(grid: &mut Grid, id: RobotId) -> Result<Annihilation, AttackRejected> {
    let robot = grid.robot(id).ok_or(AttackRejected::UnknownRobot(id))?;
    if robot.is_destroyed() {
        return Err(AttackRejected::AlreadyDestroyed);
    }

    let cell = robot.position();
    if !perception::monster_here(grid, cell) {
        return Err(AttackRejected::NoMonsterHere);
    }
    if !grid.is_in_bounds(cell) {
        return Err(AttackRejected::OutOfBounds);
    }
    let monster_id = grid
        .monster_at(cell)
        .map(|m| m.id())
        .ok_or(AttackRejected::MonsterNotRegistered)?;

    let monster = match grid.remove(monster_id.into()) {
        Some(Removed::Monster(monster)) => monster,
        _ => return Err(AttackRejected::MonsterNotRegistered),
    };
    let mut robot = match grid.remove(id.into()) {
        Some(Removed::Robot(robot)) => robot,
        _ => return Err(AttackRejected::UnknownRobot(id)),
    };
    if !grid.block_cell(cell) {
        tracing::warn!(robot = ?id, ?cell, state = ?grid.state_at(cell), "Annihilated cell could not be blocked");
    }
    debug_assert_eq!(grid.state_at(cell), CellState::Blocked);
    robot.destroyed = true;

    tracing::debug!(robot = ?id, monster = ?monster_id, ?cell, "Robot destroyed monster and itself");

    Ok(Annihilation {
        robot,
        monster,
        cell,
    })
}

/// Step along the current orientation; a failure arms the wall memory
pub fn move_forward(grid: &mut Grid, id: RobotId) -> bool {
    let Some(ahead) = grid.robot(id).map(|r| r.ahead()) else {
        return false;
    };
    let moved = grid.move_entity(id.into(), ahead);
    if let Some(robot) = grid.robot_mut(id) {
        robot.set_hit_wall(!moved);
    }
    moved
}

pub fn rotate(grid: &mut Grid, id: RobotId, axis: Axis, angle: Angle) {
    if let Some(robot) = grid.robot_mut(id) {
        robot.rotate(axis, angle);
    }
}

/// Closest live monster by Manhattan distance; registry order breaks ties
pub fn nearest_monster(grid: &Grid, from: Position) -> Option<Position> {
    grid.monsters()
        .iter()
        .map(|m| m.position())
        .min_by_key(|&pos| manhattan(from, pos))
}

/// Hunting effector
///
/// Step toward the nearest monster along the dominant axis, allowing the
/// step onto the monster's own cell. When the step is refused, face that
/// direction, or quarter-turn about Y if already facing it.
pub fn hunt(grid: &mut Grid, id: RobotId) -> RobotAction {
    let Some((position, orientation)) = grid.robot(id).map(|r| (r.position(), r.orientation())) else {
        return RobotAction::Rotate;
    };

    let heading = nearest_monster(grid, position).and_then(|target| Direction::dominant(target - position));
    let Some(heading) = heading else {
        rotate(grid, id, Axis::Y, Angle::Deg90);
        return RobotAction::Rotate;
    };

    if grid.advance_onto(id, position + heading.to_vec()) {
        return RobotAction::Move;
    }

    if orientation != heading {
        if let Some(robot) = grid.robot_mut(id) {
            robot.face(heading);
        }
        RobotAction::Reorient
    } else {
        rotate(grid, id, Axis::Y, Angle::Deg90);
        RobotAction::Rotate
    }
}

/// Run one robot's full turn
///
/// Returns `None` if the robot is no longer registered.
pub fn take_turn(grid: &mut Grid, id: RobotId, turn: Turn, recall_window: u64) -> Option<RobotTurn> {
    let robot = grid.robot(id)?;
    let perception = Perception::sense(grid, robot);

    // History lookup runs every decision but never steers it
    let _similar = robot.history().recall(&perception, turn, recall_window);

    // Wall memory only ever describes the previous turn
    if let Some(robot) = grid.robot_mut(id) {
        robot.set_hit_wall(false);
    }

    let rule = select_rule(&perception);
    let mut annihilation = None;

    let action = match rule {
        Rule::Attack => match destroy(grid, id) {
            Ok(result) => {
                annihilation = Some(result);
                RobotAction::Destroy
            }
            Err(reason) => {
                tracing::debug!(robot = ?id, %reason, "Attack aborted");
                RobotAction::AttackAborted(reason)
            }
        },
        Rule::Hunt => hunt(grid, id),
        Rule::Yield => {
            rotate(grid, id, Axis::Z, Angle::Deg90);
            RobotAction::Rotate
        }
        Rule::Recover => {
            rotate(grid, id, Axis::Y, Angle::Deg90);
            RobotAction::Rotate
        }
        Rule::Explore => {
            if move_forward(grid, id) {
                RobotAction::Move
            } else {
                rotate(grid, id, Axis::Y, Angle::Deg90);
                RobotAction::Rotate
            }
        }
    };

    let (position, orientation) = match annihilation.as_mut() {
        Some(result) => {
            result.robot.remember(turn, perception, action.clone());
            (result.cell, result.robot.orientation())
        }
        None => {
            let robot = grid.robot_mut(id)?;
            robot.remember(turn, perception, action.clone());
            (robot.position(), robot.orientation())
        }
    };

    tracing::debug!(
        turn,
        robot = ?id,
        ?rule,
        action = action.name(),
        ?position,
        orientation = %orientation,
        "Robot acted"
    );

    Some(RobotTurn {
        robot: id,
        rule,
        perception,
        action,
        position,
        orientation,
        annihilation,
    })
}
