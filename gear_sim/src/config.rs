//! Simulation configuration.
//!
//! One TOML file describes the part types (each a `GearConfig`), the gear
//! instances placed in the world, the ground, and a scripted timeline.
//!
//! ```toml
//! [shared]
//! service_name = "gear-sim"
//!
//! [sim]
//! tick_rate_hz = 50
//! ticks = 600
//! anim_length = 2.0
//!
//! [[parts]]
//! name = "LandingLeg"
//! suspension_nodes = "SuspA, SuspB, SuspC"
//! wheel_nodes = "WheelA, WheelB, WheelC"
//!
//! [[gears]]
//! name = "left"
//! part = "LandingLeg"
//!
//! [[timeline]]
//! at = 0.5
//! action = "deploy"
//! ```

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use gear_common::config::{ConfigError, GearConfig, SharedConfig};
use gear_common::state::HostMode;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Host loop parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    /// Fixed physics rate [Hz].
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,

    /// Ticks to run when the CLI does not override it.
    #[serde(default = "default_ticks")]
    pub ticks: u64,

    /// Deploy/retract animation length [s].
    #[serde(default = "default_anim_length")]
    pub anim_length: f32,

    /// Height of the flat ground plane [m].
    #[serde(default)]
    pub ground_height: f32,

    /// Binary state file; state is restored from it on start and saved on exit.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

fn default_tick_rate() -> u32 {
    50
}
fn default_ticks() -> u64 {
    500
}
fn default_anim_length() -> f32 {
    2.0
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate(),
            ticks: default_ticks(),
            anim_length: default_anim_length(),
            ground_height: 0.0,
            state_file: None,
        }
    }
}

impl SimParams {
    /// Fixed timestep [s].
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }
}

/// One gear module placed in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearInstanceConfig {
    /// Instance name (save-file key).
    pub name: String,

    /// Part type this instance is built from.
    pub part: String,

    /// Part rescale factor.
    #[serde(default = "default_scale")]
    pub scale: f32,

    #[serde(default)]
    pub mode: HostMode,

    /// Height of the wheel centers above the ground plane [m].
    #[serde(default = "default_wheel_height")]
    pub wheel_height: f32,

    /// Spacing between legs along X [m].
    #[serde(default = "default_spacing")]
    pub spacing: f32,

    /// Node names left out of the built scene.
    #[serde(default)]
    pub omit_nodes: Vec<String>,
}

fn default_scale() -> f32 {
    1.0
}
fn default_wheel_height() -> f32 {
    0.6
}
fn default_spacing() -> f32 {
    2.0
}

/// One scripted action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Simulation time the action fires at [s].
    pub at: f32,
    /// Action text, see `timeline::SimAction`.
    pub action: String,
    /// Target instance; all instances when absent.
    #[serde(default)]
    pub gear: Option<String>,
}

/// Complete simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub shared: SharedConfig,

    #[serde(default)]
    pub sim: SimParams,

    #[serde(default)]
    pub parts: Vec<GearConfig>,

    #[serde(default)]
    pub gears: Vec<GearInstanceConfig>,

    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

impl SimConfig {
    /// Validate the whole file.
    pub fn validate(&self) -> Result<(), SimError> {
        self.shared.validate()?;

        if self.sim.tick_rate_hz == 0 {
            return Err(invalid("tick_rate_hz must be positive"));
        }
        if !(self.sim.anim_length.is_finite() && self.sim.anim_length > 0.0) {
            return Err(invalid("anim_length must be positive"));
        }
        if !self.sim.ground_height.is_finite() {
            return Err(invalid("ground_height must be finite"));
        }

        let mut part_names = HashSet::new();
        for part in &self.parts {
            part.validate()?;
            if !part_names.insert(part.name.as_str()) {
                return Err(invalid(&format!("duplicate part '{}'", part.name)));
            }
        }

        let mut gear_names = HashSet::new();
        for gear in &self.gears {
            if gear.name.trim().is_empty() {
                return Err(invalid("gear name cannot be empty"));
            }
            if !gear_names.insert(gear.name.as_str()) {
                return Err(invalid(&format!("duplicate gear '{}'", gear.name)));
            }
            if !part_names.contains(gear.part.as_str()) {
                return Err(SimError::UnknownPart {
                    gear: gear.name.clone(),
                    part: gear.part.clone(),
                });
            }
            if !(gear.scale.is_finite() && gear.scale > 0.0) {
                return Err(invalid(&format!("gear '{}': scale must be positive", gear.name)));
            }
        }

        for entry in &self.timeline {
            if !(entry.at.is_finite() && entry.at >= 0.0) {
                return Err(SimError::Timeline(format!("invalid time {}", entry.at)));
            }
            if let Some(target) = &entry.gear {
                if !gear_names.contains(target.as_str()) {
                    return Err(SimError::Timeline(format!(
                        "'{}' at {}s targets unknown gear '{target}'",
                        entry.action, entry.at
                    )));
                }
            }
        }
        Ok(())
    }

    /// Part types keyed by name, each parsed once and shared.
    pub fn part_table(&self) -> HashMap<String, Arc<GearConfig>> {
        self.parts
            .iter()
            .map(|part| (part.name.clone(), Arc::new(part.clone())))
            .collect()
    }
}

fn invalid(message: &str) -> SimError {
    SimError::Config(ConfigError::ValidationError(message.to_string()))
}
