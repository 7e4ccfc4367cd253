//! Monster behaviour - a single random step every K turns

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{MonsterId, Position, Turn};
use crate::world::generation::random_direction;
use crate::world::grid::Grid;

/// What a monster did this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WanderOutcome {
    /// Not an acting turn for this monster
    Resting,
    /// Sampled a direction but the target cell was not Free
    Stayed,
    Moved { from: Position, to: Position },
}

/// Let one monster act on `turn`
///
/// Draws exactly one direction from `rng` on acting turns and never retries.
/// Returns `None` if the monster is no longer registered.
pub fn wander<R: Rng + ?Sized>(grid: &mut Grid, id: MonsterId, turn: Turn, rng: &mut R) -> Option<WanderOutcome> {
    let monster = grid.monster(id)?;
    if !monster.acts_on(turn) {
        return Some(WanderOutcome::Resting);
    }

    let from = monster.position();
    let to = from + random_direction(rng).to_vec();

    let outcome = if grid.move_entity(id.into(), to) {
        WanderOutcome::Moved { from, to }
    } else {
        WanderOutcome::Stayed
    };

    tracing::debug!(turn, monster = ?id, ?outcome, "Monster wandered");
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::grid::CellState;
    use glam::IVec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rests_off_period() {
        let mut grid = Grid::new(3);
        let id = grid.spawn_monster(IVec3::new(1, 1, 1), 3).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for turn in [1, 2, 4, 5, 7] {
            assert_eq!(wander(&mut grid, id, turn, &mut rng), Some(WanderOutcome::Resting));
        }
        assert_eq!(grid.monster(id).unwrap().position(), IVec3::new(1, 1, 1));
    }

    #[test]
    fn test_open_grid_center_always_moves() {
        let mut grid = Grid::new(3);
        let id = grid.spawn_monster(IVec3::new(1, 1, 1), 1).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        match wander(&mut grid, id, 0, &mut rng) {
            Some(WanderOutcome::Moved { from, to }) => {
                assert_eq!(from, IVec3::new(1, 1, 1));
                assert_eq!((to - from).abs().element_sum(), 1);
                assert_eq!(grid.state_at(from), CellState::Free);
                assert_eq!(grid.state_at(to), CellState::MonsterOccupied);
            }
            other => panic!("expected a move, got {:?}", other),
        }
    }

    #[test]
    fn test_boxed_in_monster_stays() {
        let mut grid = Grid::new(1);
        let id = grid.spawn_monster(IVec3::ZERO, 1).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for turn in 0..10 {
            assert_eq!(wander(&mut grid, id, turn, &mut rng), Some(WanderOutcome::Stayed));
        }
        assert!(grid.occupancy_consistent());
    }

    #[test]
    fn test_unknown_monster() {
        let mut grid = Grid::new(2);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(wander(&mut grid, MonsterId(3), 0, &mut rng), None);
    }
}
