//! Entity records owned by the grid registries

pub mod memory;
pub mod monster;
pub mod robot;

pub use memory::{History, MemoryEntry};
pub use monster::Monster;
pub use robot::Robot;
