//! Error types for the host simulation.

use gear_common::config::ConfigError;
use thiserror::Error;

/// Errors raised while building or running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A gear instance references a part type that is not defined.
    #[error("Gear '{gear}' references unknown part '{part}'")]
    UnknownPart { gear: String, part: String },

    /// A timeline entry could not be parsed.
    #[error("Timeline error: {0}")]
    Timeline(String),

    /// State file could not be written or read.
    #[error("State persistence error: {0}")]
    Persistence(String),
}
