//! Configuration loading traits and types.
//!
//! Provides the TOML loader shared by all gear crates and the per-part-type
//! `GearConfig`. A `GearConfig` is parsed once per part type and shared by
//! every gear instance of that type (`Arc<GearConfig>`).
//!
//! # TOML Example
//!
//! ```toml
//! name = "LandingLeg-L1"
//! suspension_nodes = "SuspensionA, SuspensionB, SuspensionC"
//! wheel_nodes = "WheelA, WheelB, WheelC"
//! foot_nodes = "FootA, FootB, FootC"
//! decompress_duration = 1.0
//! action_group = "Gear"
//!
//! [overrides]
//! wheel_radius = 0.25
//! suspension_travel = -1.0   # keep component default
//!
//! [labels]
//! deploy = "Deploy Legs"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::consts::{
    DECOMPRESS_DURATION_MAX, DEFAULT_DECOMPRESS_DURATION, MAX_LEGS, USE_COMPONENT_DEFAULT,
};

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Raise to at least `Debug` when `verbose` is set.
    pub const fn with_verbose(self, verbose: bool) -> Self {
        match self {
            Self::Trace => Self::Trace,
            _ if verbose => Self::Debug,
            level => level,
        }
    }
}

/// Common configuration fields shared across gear applications.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "gear-sim-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation: any serde-deserializable struct can be loaded.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

// ─── Gear Config ────────────────────────────────────────────────────

/// Physical overrides applied to every leg's wheel component.
///
/// Negative values (see `USE_COMPONENT_DEFAULT`) keep the component default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalOverrides {
    /// Wheel radius [m].
    pub wheel_radius: f32,
    /// Suspension travel [m].
    pub suspension_travel: f32,
    /// Spring rate.
    pub suspension_spring: f32,
    /// Damper rate.
    pub suspension_damper: f32,
    /// Spring target position (0..1 of travel).
    pub suspension_target: f32,
}

impl Default for PhysicalOverrides {
    fn default() -> Self {
        Self {
            wheel_radius: USE_COMPONENT_DEFAULT,
            suspension_travel: USE_COMPONENT_DEFAULT,
            suspension_spring: USE_COMPONENT_DEFAULT,
            suspension_damper: USE_COMPONENT_DEFAULT,
            suspension_target: USE_COMPONENT_DEFAULT,
        }
    }
}

impl PhysicalOverrides {
    /// Resolve an override against a component default.
    #[inline]
    pub fn resolve(value: f32, component_default: f32) -> f32 {
        if value < 0.0 { component_default } else { value }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("wheel_radius", self.wheel_radius),
            ("suspension_travel", self.suspension_travel),
            ("suspension_spring", self.suspension_spring),
            ("suspension_damper", self.suspension_damper),
            ("suspension_target", self.suspension_target),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "overrides.{name} must be finite"
                )));
            }
        }
        if self.suspension_target > 1.0 {
            return Err(ConfigError::ValidationError(format!(
                "overrides.suspension_target {} out of range [0, 1]",
                self.suspension_target
            )));
        }
        Ok(())
    }
}

/// Display labels for the three GUI actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GearLabels {
    pub deploy: String,
    pub retract: String,
    pub repair: String,
}

impl Default for GearLabels {
    fn default() -> Self {
        Self {
            deploy: "Deploy Landing Legs".to_string(),
            retract: "Retract Landing Legs".to_string(),
            repair: "Repair Landing Legs".to_string(),
        }
    }
}

/// Static per-part-type gear configuration.
///
/// Read once at setup, immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearConfig {
    /// Part type name.
    pub name: String,

    /// Comma-separated suspension node names, one per leg.
    pub suspension_nodes: String,

    /// Comma-separated wheel-physics node names, one per leg.
    pub wheel_nodes: String,

    /// Comma-separated foot collider node names (optional per leg).
    #[serde(default)]
    pub foot_nodes: String,

    /// Physical overrides for the wheel components.
    #[serde(default)]
    pub overrides: PhysicalOverrides,

    /// Static suspension offset added to computed compression [m].
    #[serde(default)]
    pub suspension_offset: f32,

    /// Decompression window before the retract animation [s].
    #[serde(default = "default_decompress_duration")]
    pub decompress_duration: f32,

    /// GUI labels.
    #[serde(default)]
    pub labels: GearLabels,

    /// Action-group binding name routed to the toggle command.
    #[serde(default = "default_action_group")]
    pub action_group: String,
}

fn default_decompress_duration() -> f32 {
    DEFAULT_DECOMPRESS_DURATION
}
fn default_action_group() -> String {
    "Gear".to_string()
}

/// Split a comma-separated node list, trimming every entry.
///
/// Empty entries are kept so indices line up across lists.
pub fn split_node_list(list: &str) -> Vec<&str> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    list.split(',').map(str::trim).collect()
}

impl GearConfig {
    /// Minimal configuration for the given node lists.
    pub fn new(name: &str, suspension_nodes: &str, wheel_nodes: &str) -> Self {
        Self {
            name: name.to_string(),
            suspension_nodes: suspension_nodes.to_string(),
            wheel_nodes: wheel_nodes.to_string(),
            foot_nodes: String::new(),
            overrides: PhysicalOverrides::default(),
            suspension_offset: 0.0,
            decompress_duration: DEFAULT_DECOMPRESS_DURATION,
            labels: GearLabels::default(),
            action_group: default_action_group(),
        }
    }

    pub fn suspension_names(&self) -> Vec<&str> {
        split_node_list(&self.suspension_nodes)
    }

    pub fn wheel_names(&self) -> Vec<&str> {
        split_node_list(&self.wheel_nodes)
    }

    pub fn foot_names(&self) -> Vec<&str> {
        split_node_list(&self.foot_nodes)
    }

    /// Number of configured legs (driven by the suspension list).
    pub fn leg_count(&self) -> usize {
        self.suspension_names().len()
    }

    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gear name cannot be empty".to_string(),
            ));
        }
        let legs = self.leg_count();
        if legs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "gear '{}': suspension_nodes cannot be empty",
                self.name
            )));
        }
        if legs > MAX_LEGS {
            return Err(ConfigError::ValidationError(format!(
                "gear '{}': {} legs configured, maximum is {}",
                self.name, legs, MAX_LEGS
            )));
        }
        if !(self.decompress_duration > 0.0 && self.decompress_duration <= DECOMPRESS_DURATION_MAX)
        {
            return Err(ConfigError::ValidationError(format!(
                "gear '{}': decompress_duration {} out of range (0, {}]",
                self.name, self.decompress_duration, DECOMPRESS_DURATION_MAX
            )));
        }
        if !self.suspension_offset.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "gear '{}': suspension_offset must be finite",
                self.name
            )));
        }
        self.overrides.validate()
    }
}
