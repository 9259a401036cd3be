//! State enums shared by the gear controller and its hosts.
//!
//! `GearState` is the logical state of one gear module and is persisted as
//! text. `AnimState` is the playback model of the external animation player.
//! Both use `#[repr(u8)]` for compact storage.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::GearError;

// ─── Gear State ─────────────────────────────────────────────────────

/// Logical landing gear state.
///
/// Exactly one value is active per gear module. `Broken` exits only via
/// an explicit repair, which lands in `Retracted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GearState {
    /// Deploy animation playing, legs in transit.
    Deploying = 0,
    /// Legs fully out, suspension simulated.
    Deployed = 1,
    /// Decompressing or retract animation playing.
    Retracting = 2,
    /// Legs stowed.
    Retracted = 3,
    /// Failed: all physics disabled until repaired.
    Broken = 4,
}

impl GearState {
    /// Every state, in declaration order.
    pub const ALL: [GearState; 5] = [
        Self::Deploying,
        Self::Deployed,
        Self::Retracting,
        Self::Retracted,
        Self::Broken,
    ];

    /// Persisted text form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deploying => "DEPLOYING",
            Self::Deployed => "DEPLOYED",
            Self::Retracting => "RETRACTING",
            Self::Retracted => "RETRACTED",
            Self::Broken => "BROKEN",
        }
    }

    /// Legs are moving between the stable endpoints.
    #[inline]
    pub const fn is_in_transit(&self) -> bool {
        matches!(self, Self::Deploying | Self::Retracting)
    }

    /// Nearest stable endpoint, used when a save is reloaded mid-animation.
    pub const fn settled(&self) -> Self {
        match self {
            Self::Deploying => Self::Deployed,
            Self::Retracting => Self::Retracted,
            other => *other,
        }
    }

    /// Physics components that must be enabled while in this state.
    ///
    /// Does not cover the decompression window of `Retracting`, during which
    /// the wheel physics stays on until the window closes.
    pub const fn component_policy(&self) -> LegComponents {
        match self {
            Self::Deployed => LegComponents::WHEEL_PHYSICS,
            state if state.is_in_transit() => LegComponents::FOOT_COLLIDER,
            _ => LegComponents::empty(),
        }
    }
}

impl Default for GearState {
    fn default() -> Self {
        Self::Retracted
    }
}

impl fmt::Display for GearState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GearState {
    type Err = GearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| GearError::InvalidGearState(trimmed.to_string()))
    }
}

// ─── Animation State ────────────────────────────────────────────────

/// Playback state of the external animation player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AnimState {
    /// Stopped at the retracted pose.
    StoppedStart = 0,
    /// Playing towards the deployed pose.
    PlayingForward = 1,
    /// Stopped at the deployed pose.
    StoppedEnd = 2,
    /// Playing towards the retracted pose.
    PlayingBackward = 3,
}

impl AnimState {
    /// Returns true for the two resting states.
    #[inline]
    pub const fn is_stopped(&self) -> bool {
        matches!(self, Self::StoppedStart | Self::StoppedEnd)
    }

    /// Resting state a playing direction ends in.
    pub const fn destination(&self) -> Self {
        match self {
            Self::PlayingForward | Self::StoppedEnd => Self::StoppedEnd,
            Self::PlayingBackward | Self::StoppedStart => Self::StoppedStart,
        }
    }
}

impl Default for AnimState {
    fn default() -> Self {
        Self::StoppedStart
    }
}

// ─── Host Mode ──────────────────────────────────────────────────────

/// Context the controller runs in.
///
/// In `Editor` the fixed tick never runs, so transitions resolve instantly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HostMode {
    /// Live simulation: animations play, suspension is simulated.
    #[default]
    Flight,
    /// Design-time: no animation, no physics tick.
    Editor,
}

// ─── Commands ───────────────────────────────────────────────────────

/// User/automation-facing gear command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GearCommand {
    Deploy,
    Retract,
    Repair,
    /// Deploy or retract depending on the current state.
    Toggle,
}

impl GearCommand {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Retract => "retract",
            Self::Repair => "repair",
            Self::Toggle => "toggle",
        }
    }
}

impl fmt::Display for GearCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Component Flags ────────────────────────────────────────────────

bitflags! {
    /// Per-leg physics components toggled by the gear controller.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LegComponents: u8 {
        /// Wheel-physics (spring/damper) component.
        const WHEEL_PHYSICS = 0x01;
        /// Flat contact proxy used while a leg is in transit.
        const FOOT_COLLIDER = 0x02;
    }
}

impl Default for LegComponents {
    fn default() -> Self {
        Self::empty()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
