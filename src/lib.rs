//! Robot Hunt - reactive robots hunting wandering monsters in a 3D grid

pub mod core;
pub mod entity;
pub mod simulation;
pub mod world;
