//! Prelude module for common re-exports.
//!
//! ```rust
//! use gear_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    ConfigError, ConfigLoader, GearConfig, GearLabels, PhysicalOverrides, SharedConfig,
};

// ─── State ──────────────────────────────────────────────────────────
pub use crate::state::{AnimState, GearCommand, GearState, HostMode, LegComponents};

// ─── Persistence ────────────────────────────────────────────────────
pub use crate::persist::PersistedGear;

// ─── Errors ─────────────────────────────────────────────────────────
pub use crate::error::{GearError, LegSetupError};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{DEFAULT_DECOMPRESS_DURATION, DEFAULT_FIXED_DT, MAX_LEGS};
