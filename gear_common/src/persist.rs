//! Persisted gear record.
//!
//! The gear state is stored as text through an explicit, versioned mapping.
//! Version 1 records could also carry a pending decompression countdown;
//! version 2 never writes one.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{PERSIST_VERSION, PERSIST_VERSION_LEGACY};
use crate::error::GearError;
use crate::state::GearState;

/// Save-file fields of one gear module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedGear {
    /// Record format version.
    pub version: u32,
    /// Gear state text (see `GearState::as_str`).
    pub gear_state: String,
    /// Pending decompression countdown [s] (legacy records only).
    #[serde(default)]
    pub decompress_remaining: f32,
}

impl PersistedGear {
    /// Record for the given state in the current format.
    pub fn new(state: GearState) -> Self {
        Self {
            version: PERSIST_VERSION,
            gear_state: state.as_str().to_string(),
            decompress_remaining: 0.0,
        }
    }

    /// Decode the record into a state and a pending countdown.
    ///
    /// Fails on unknown versions or unparseable state text.
    pub fn decode(&self) -> Result<(GearState, f32), GearError> {
        if self.version == 0 || self.version > PERSIST_VERSION {
            return Err(GearError::UnsupportedVersion {
                found: self.version,
                current: PERSIST_VERSION,
            });
        }
        let state: GearState = self.gear_state.parse()?;
        let countdown = if self.version == PERSIST_VERSION_LEGACY
            && self.decompress_remaining.is_finite()
        {
            self.decompress_remaining.max(0.0)
        } else {
            0.0
        };
        Ok((state, countdown))
    }

    /// Decode with the defined fallback: `Retracted`, no countdown.
    pub fn decode_or_default(&self) -> (GearState, f32) {
        self.decode().unwrap_or_else(|e| {
            warn!("{e}, restoring gear as {}", GearState::Retracted);
            (GearState::Retracted, 0.0)
        })
    }
}

impl Default for PersistedGear {
    fn default() -> Self {
        Self::new(GearState::default())
    }
}
