//! Core type definitions used throughout the codebase

use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Integer cell coordinate (x, y, z)
pub type Position = IVec3;

/// Simulation turn counter
pub type Turn = u64;

/// Unique identifier for robots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RobotId(pub u32);

/// Unique identifier for monsters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

/// Kind tag stored alongside every grid registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Robot,
    Monster,
}

/// Typed reference to a registered entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Robot(RobotId),
    Monster(MonsterId),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Robot(_) => EntityKind::Robot,
            EntityRef::Monster(_) => EntityKind::Monster,
        }
    }
}

impl From<RobotId> for EntityRef {
    fn from(id: RobotId) -> Self {
        EntityRef::Robot(id)
    }
}

impl From<MonsterId> for EntityRef {
    fn from(id: MonsterId) -> Self {
        EntityRef::Monster(id)
    }
}

/// Global rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Quarter-turn rotation angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Angle {
    Deg90,
    Deg180,
    Deg270,
}

/// One of the six axis-aligned unit vectors
///
/// Used both for robot orientation and for neighbour offsets. Conversions
/// to and from `IVec3` go through `to_vec` / `from_vec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Direction {
    /// All six directions in a fixed order (+X, -X, +Y, -Y, +Z, -Z)
    pub const ALL: [Direction; 6] = [
        Direction::PosX,
        Direction::NegX,
        Direction::PosY,
        Direction::NegY,
        Direction::PosZ,
        Direction::NegZ,
    ];

    #[inline]
    pub fn to_vec(self) -> IVec3 {
        match self {
            Direction::PosX => IVec3::X,
            Direction::NegX => IVec3::NEG_X,
            Direction::PosY => IVec3::Y,
            Direction::NegY => IVec3::NEG_Y,
            Direction::PosZ => IVec3::Z,
            Direction::NegZ => IVec3::NEG_Z,
        }
    }

    /// Returns the direction for a unit axis vector, `None` for anything else
    pub fn from_vec(v: IVec3) -> Option<Self> {
        match (v.x, v.y, v.z) {
            (1, 0, 0) => Some(Direction::PosX),
            (-1, 0, 0) => Some(Direction::NegX),
            (0, 1, 0) => Some(Direction::PosY),
            (0, -1, 0) => Some(Direction::NegY),
            (0, 0, 1) => Some(Direction::PosZ),
            (0, 0, -1) => Some(Direction::NegZ),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::PosX => Direction::NegX,
            Direction::NegX => Direction::PosX,
            Direction::PosY => Direction::NegY,
            Direction::NegY => Direction::PosY,
            Direction::PosZ => Direction::NegZ,
            Direction::NegZ => Direction::PosZ,
        }
    }

    /// Right-hand rotation about a global axis
    ///
    /// Rotating about the axis the direction lies on leaves it unchanged.
    pub fn rotated(self, axis: Axis, angle: Angle) -> Self {
        let v = self.to_vec();
        let (x, y, z) = (v.x, v.y, v.z);
        let r = match (axis, angle) {
            (Axis::X, Angle::Deg90) => IVec3::new(x, -z, y),
            (Axis::X, Angle::Deg180) => IVec3::new(x, -y, -z),
            (Axis::X, Angle::Deg270) => IVec3::new(x, z, -y),
            (Axis::Y, Angle::Deg90) => IVec3::new(z, y, -x),
            (Axis::Y, Angle::Deg180) => IVec3::new(-x, y, -z),
            (Axis::Y, Angle::Deg270) => IVec3::new(-z, y, x),
            (Axis::Z, Angle::Deg90) => IVec3::new(-y, x, z),
            (Axis::Z, Angle::Deg180) => IVec3::new(-x, -y, z),
            (Axis::Z, Angle::Deg270) => IVec3::new(y, -x, z),
        };
        // A signed permutation of a unit axis vector is always a unit axis vector
        Self::from_vec(r).unwrap_or(self)
    }

    /// Unit step along the dominant axis of `delta`
    ///
    /// Ties on the largest absolute component resolve in X, Y, Z order.
    /// Returns `None` for the zero vector.
    pub fn dominant(delta: IVec3) -> Option<Self> {
        let abs = delta.abs();
        if abs == IVec3::ZERO {
            return None;
        }
        let v = if abs.x >= abs.y && abs.x >= abs.z {
            IVec3::new(delta.x.signum(), 0, 0)
        } else if abs.y >= abs.z {
            IVec3::new(0, delta.y.signum(), 0)
        } else {
            IVec3::new(0, 0, delta.z.signum())
        };
        Self::from_vec(v)
    }

    /// Human-readable label, e.g. "+X (forward)"
    pub fn label(&self) -> &'static str {
        match self {
            Direction::PosX => "+X (forward)",
            Direction::NegX => "-X (backward)",
            Direction::PosY => "+Y (right)",
            Direction::NegY => "-Y (left)",
            Direction::PosZ => "+Z (up)",
            Direction::NegZ => "-Z (down)",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Manhattan distance between two cells
#[inline]
pub fn manhattan(a: Position, b: Position) -> i32 {
    let d = (a - b).abs();
    d.x + d.y + d.z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_round_trips_through_vec() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_vec(dir.to_vec()), Some(dir));
        }
        assert_eq!(Direction::from_vec(IVec3::new(1, 1, 0)), None);
    }

    #[test]
    fn test_rotation_about_y_matches_right_hand_rule() {
        // +X rotated 90 about Y points to -Z
        assert_eq!(Direction::PosX.rotated(Axis::Y, Angle::Deg90), Direction::NegZ);
        assert_eq!(Direction::PosZ.rotated(Axis::Y, Angle::Deg90), Direction::PosX);
        // +X rotated 90 about Z points to +Y
        assert_eq!(Direction::PosX.rotated(Axis::Z, Angle::Deg90), Direction::PosY);
        // +Y rotated 90 about X points to +Z
        assert_eq!(Direction::PosY.rotated(Axis::X, Angle::Deg90), Direction::PosZ);
    }

    #[test]
    fn test_rotation_about_collinear_axis_is_identity() {
        for angle in [Angle::Deg90, Angle::Deg180, Angle::Deg270] {
            assert_eq!(Direction::PosY.rotated(Axis::Y, angle), Direction::PosY);
            assert_eq!(Direction::NegX.rotated(Axis::X, angle), Direction::NegX);
            assert_eq!(Direction::PosZ.rotated(Axis::Z, angle), Direction::PosZ);
        }
    }

    #[test]
    fn test_270_is_inverse_of_90() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            for dir in Direction::ALL {
                let there = dir.rotated(axis, Angle::Deg90);
                assert_eq!(there.rotated(axis, Angle::Deg270), dir);
            }
        }
    }

    #[test]
    fn test_dominant_axis_tie_break() {
        assert_eq!(Direction::dominant(IVec3::new(2, -2, 2)), Some(Direction::PosX));
        assert_eq!(Direction::dominant(IVec3::new(0, -3, 3)), Some(Direction::NegY));
        assert_eq!(Direction::dominant(IVec3::new(1, 0, -4)), Some(Direction::NegZ));
        assert_eq!(Direction::dominant(IVec3::ZERO), None);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(IVec3::new(0, 0, 0), IVec3::new(1, -2, 3)), 6);
        assert_eq!(manhattan(IVec3::new(4, 4, 4), IVec3::new(4, 4, 4)), 0);
    }

    #[test]
    fn test_entity_ref_kind() {
        assert_eq!(EntityRef::from(RobotId(3)).kind(), EntityKind::Robot);
        assert_eq!(EntityRef::from(MonsterId(3)).kind(), EntityKind::Monster);
    }
}
