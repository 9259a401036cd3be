//! Error types for the gear controller.
//!
//! Leg setup failures are recoverable: the leg is dropped and the gear keeps
//! running on the rest. Persisted-state errors fall back to `Retracted`.

use thiserror::Error;

/// Why a configured leg was left out of the active set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LegSetupError {
    /// No suspension node name configured for this leg index.
    #[error("leg {index}: no suspension node name configured")]
    MissingSuspensionName { index: usize },

    /// No wheel node name configured for this leg index.
    #[error("leg {index}: no wheel node name configured")]
    MissingWheelName { index: usize },

    /// Named node does not exist in the scene.
    #[error("leg {index}: node '{name}' not found")]
    NodeNotFound { index: usize, name: String },

    /// Wheel node exists but carries no wheel-physics component.
    #[error("leg {index}: node '{name}' has no wheel physics component")]
    NoWheelPhysics { index: usize, name: String },

    /// The active set is already full.
    #[error("leg {index}: exceeds maximum of {max} legs")]
    CapacityExceeded { index: usize, max: usize },
}

impl LegSetupError {
    /// Index of the configured leg this error refers to.
    pub const fn index(&self) -> usize {
        match self {
            Self::MissingSuspensionName { index }
            | Self::MissingWheelName { index }
            | Self::NodeNotFound { index, .. }
            | Self::NoWheelPhysics { index, .. }
            | Self::CapacityExceeded { index, .. } => *index,
        }
    }
}

/// Gear-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GearError {
    /// Persisted state text does not name a gear state.
    #[error("invalid persisted gear state '{0}'")]
    InvalidGearState(String),

    /// Persisted record version is not understood.
    #[error("unsupported persisted gear version {found} (expected <= {current})")]
    UnsupportedVersion { found: u32, current: u32 },
}
