//! Simulation configuration with documented constants
//!
//! Every tunable lives here. Values can be overridden from a TOML file
//! (any missing key keeps its default) and then from the command line.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ConfigError, Result};
use crate::world::grid::{cube_cell_count, MAX_SIZE};

/// Complete configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub population: PopulationConfig,
    pub behavior: BehaviorConfig,
    pub run: RunConfig,
}

/// World generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length N of the NxNxN cube
    pub size: u32,

    /// Target fraction of cells explicitly generated as Free
    ///
    /// Cells not covered by either fraction also stay Free, so this only
    /// matters relative to `blocked_fraction`.
    pub free_fraction: f64,

    /// Target fraction of cells generated as Blocked
    pub blocked_fraction: f64,

    /// Seed for the simulation RNG. `None` draws one from entropy.
    pub seed: Option<u64>,

    /// Uniform probes tried before a free-cell search gives up
    pub max_probe_attempts: u32,
}

/// Initial entity counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub robots: u32,
    pub monsters: u32,
}

/// Entity behaviour constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Monsters act once every K turns (on turns where `turn % K == 0`)
    pub monster_move_period: u32,

    /// Maximum history entries kept per robot (oldest evicted first)
    pub history_capacity: usize,

    /// How far back, in turns, the history recall looks
    pub recall_window: u64,
}

/// Turn loop parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Turn limit before the run ends without a winner
    pub max_turns: u64,

    /// Real-time pause between turns in the CLI driver (milliseconds)
    pub turn_delay_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 8,
            free_fraction: 0.7,
            blocked_fraction: 0.2,
            seed: None,
            max_probe_attempts: 1000,
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            robots: 3,
            monsters: 5,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            monster_move_period: 3,
            history_capacity: 50,
            recall_window: 10,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_turns: 50,
            turn_delay_ms: 0,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            population: PopulationConfig::default(),
            behavior: BehaviorConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.world.validate()?;

        if self.behavior.monster_move_period == 0 {
            return Err(ConfigError::ZeroMovePeriod);
        }

        if self.behavior.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }

        Ok(())
    }
}

impl WorldConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::ZeroSize(self.size));
        }
        if self.size > MAX_SIZE {
            return Err(ConfigError::SizeTooLarge {
                size: self.size,
                max: MAX_SIZE,
            });
        }

        for (name, value) in [
            ("free_fraction", self.free_fraction),
            ("blocked_fraction", self.blocked_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::FractionOutOfRange { name, value });
            }
        }

        if self.free_fraction + self.blocked_fraction > 1.0 {
            return Err(ConfigError::FractionsExceedOne {
                free: self.free_fraction,
                blocked: self.blocked_fraction,
            });
        }

        Ok(())
    }

    /// Total number of cells in the cube, `None` on overflow
    pub fn cell_count(&self) -> Option<usize> {
        cube_cell_count(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::HuntError;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_fractions_must_not_exceed_one() {
        let mut config = SimulationConfig::default();
        config.world.free_fraction = 0.8;
        config.world.blocked_fraction = 0.3;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FractionsExceedOne { .. })
        ));
    }

    #[test]
    fn test_negative_fraction_rejected() {
        let mut config = SimulationConfig::default();
        config.world.blocked_fraction = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FractionOutOfRange { name: "blocked_fraction", .. })
        ));
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut config = SimulationConfig::default();
        config.behavior.monster_move_period = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroMovePeriod));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [world]
            size = 5
            seed = 7

            [population]
            monsters = 2
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.world.size, 5);
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.world.free_fraction, 0.7);
        assert_eq!(config.population.robots, 3);
        assert_eq!(config.population.monsters, 2);
        assert_eq!(config.behavior.monster_move_period, 3);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        let result = SimulationConfig::from_toml_str("[world]\nsize = 0\n");
        assert!(matches!(result, Err(HuntError::Config(ConfigError::ZeroSize(0)))));
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = SimulationConfig::from_toml_str(include_str!("../../config/simulation.toml"))
            .expect("shipped config should parse");
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_cell_count() {
        let world = WorldConfig { size: 4, ..Default::default() };
        assert_eq!(world.cell_count(), Some(64));
    }

    #[test]
    fn test_oversized_world_rejected() {
        let mut config = SimulationConfig::default();
        config.world.size = 3_000_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::SizeTooLarge { size: 3_000_000, max: MAX_SIZE })
        );

        config.world.size = MAX_SIZE + 1;
        assert!(config.validate().is_err());

        config.world.size = MAX_SIZE;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_oversized_world_rejected_from_toml() {
        let result = SimulationConfig::from_toml_str("[world]\nsize = 3000000\n");
        assert!(matches!(
            result,
            Err(HuntError::Config(ConfigError::SizeTooLarge { size: 3_000_000, .. }))
        ));
    }
}
