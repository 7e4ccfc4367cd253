//! World model: the cube grid and its generation

pub mod generation;
pub mod grid;

pub use generation::{generate, random_direction, random_free_cell, random_free_cells, regenerate};
pub use grid::{cube_cell_count, CellState, Grid, GridStats, Removed, MAX_SIZE};
