use thiserror::Error;

/// Configuration validation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("World size must be at least 1, got {0}")]
    ZeroSize(u32),

    #[error("World size {size} exceeds the maximum of {max}")]
    SizeTooLarge { size: u32, max: u32 },

    #[error("Fraction {name} must be within [0, 1], got {value}")]
    FractionOutOfRange { name: &'static str, value: f64 },

    #[error("free_fraction + blocked_fraction must not exceed 1.0 (got {free} + {blocked})")]
    FractionsExceedOne { free: f64, blocked: f64 },

    #[error("Monster move period must be at least 1")]
    ZeroMovePeriod,

    #[error("History capacity must be at least 1")]
    ZeroHistoryCapacity,
}

#[derive(Error, Debug)]
pub enum HuntError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Simulation task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("No free cell found after {attempts} probes")]
    NoFreeCell { attempts: u32 },
}

pub type Result<T> = std::result::Result<T, HuntError>;
