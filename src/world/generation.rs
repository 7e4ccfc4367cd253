//! World generation and free-cell probing
//!
//! All randomness comes from the caller's RNG so a seeded run is fully
//! reproducible.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::WorldConfig;
use crate::core::types::{Direction, Position};
use crate::world::grid::{CellState, Grid};

/// Build a fresh grid with the configured terrain mix
pub fn generate<R: Rng + ?Sized>(config: &WorldConfig, rng: &mut R) -> Grid {
    let mut grid = Grid::new(config.size);
    fill_terrain(&mut grid, config.free_fraction, config.blocked_fraction, rng);
    grid
}

/// Shuffle every coordinate and assign terrain by fraction
///
/// The first `floor(total * free)` shuffled cells become Free, the next
/// `floor(total * blocked)` become Blocked, and the remainder stay Free.
fn fill_terrain<R: Rng + ?Sized>(grid: &mut Grid, free_fraction: f64, blocked_fraction: f64, rng: &mut R) {
    let total = grid.cell_count();
    let free_cells = ((total as f64 * free_fraction) as usize).min(total);
    let blocked_cells = ((total as f64 * blocked_fraction) as usize).min(total - free_cells);

    let mut positions: Vec<Position> = grid.positions().collect();
    positions.shuffle(rng);

    for (i, pos) in positions.into_iter().enumerate() {
        let blocked = i >= free_cells && i < free_cells + blocked_cells;
        grid.set_terrain(pos, blocked);
    }

    tracing::debug!(
        size = grid.size(),
        free = grid.count(CellState::Free),
        blocked = grid.count(CellState::Blocked),
        "Generated terrain"
    );
}

/// Re-roll the terrain of an entity-free grid in place
///
/// Returns false (leaving the grid untouched) when entities are registered,
/// since their cells would otherwise be overwritten.
pub fn regenerate<R: Rng + ?Sized>(grid: &mut Grid, config: &WorldConfig, rng: &mut R) -> bool {
    if grid.has_entities() {
        tracing::warn!("Refusing to regenerate a grid that still holds entities");
        return false;
    }
    if grid.size() != config.size {
        *grid = Grid::new(config.size);
    }
    fill_terrain(grid, config.free_fraction, config.blocked_fraction, rng);
    true
}

/// Uniformly probe for a Free cell, giving up after `max_attempts`
pub fn random_free_cell<R: Rng + ?Sized>(grid: &Grid, rng: &mut R, max_attempts: u32) -> Option<Position> {
    let n = grid.size() as i32;
    if n == 0 {
        return None;
    }
    (0..max_attempts)
        .map(|_| Position::new(rng.gen_range(0..n), rng.gen_range(0..n), rng.gen_range(0..n)))
        .find(|&pos| grid.state_at(pos).is_free())
}

/// Up to `count` distinct Free cells
///
/// Cells are not reserved on the grid, so the same probe budget applies per
/// requested cell and already-picked cells count as misses.
pub fn random_free_cells<R: Rng + ?Sized>(
    grid: &Grid,
    rng: &mut R,
    count: usize,
    max_attempts: u32,
) -> Vec<Position> {
    let n = grid.size() as i32;
    let mut picked: Vec<Position> = Vec::with_capacity(count);
    if n == 0 {
        return picked;
    }

    for _ in 0..count {
        let found = (0..max_attempts)
            .map(|_| Position::new(rng.gen_range(0..n), rng.gen_range(0..n), rng.gen_range(0..n)))
            .find(|pos| grid.state_at(*pos).is_free() && !picked.contains(pos));
        match found {
            Some(pos) => picked.push(pos),
            None => break,
        }
    }
    picked
}

/// One of the six axis directions, uniformly
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}
