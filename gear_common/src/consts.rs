//! Workspace-wide constants for the landing gear crates.
//!
//! Single source of truth for numeric limits and defaults.

use static_assertions::const_assert;

/// Maximum number of legs a single gear module can drive.
pub const MAX_LEGS: usize = 16;

/// Default decompression window before the retract animation starts [s].
pub const DEFAULT_DECOMPRESS_DURATION: f32 = 1.0;

/// Upper bound accepted for `decompress_duration` [s].
pub const DECOMPRESS_DURATION_MAX: f32 = 60.0;

/// Default fixed physics timestep [s] (50 Hz).
pub const DEFAULT_FIXED_DT: f32 = 0.02;

/// Current persisted gear record version.
pub const PERSIST_VERSION: u32 = 2;

/// Legacy persisted record version that may carry a decompression countdown.
pub const PERSIST_VERSION_LEGACY: u32 = 1;

/// Sentinel used by physical overrides meaning "keep the component default".
pub const USE_COMPONENT_DEFAULT: f32 = -1.0;

/// Default configuration file path for the host simulation.
pub const DEFAULT_CONFIG_PATH: &str = "config/gear_sim.toml";

const_assert!(MAX_LEGS > 0 && MAX_LEGS <= 32);
const_assert!(PERSIST_VERSION > PERSIST_VERSION_LEGACY);
