//! State persistence for the host simulation.
//!
//! Saves every gear's `PersistedGear` record across runs. The snapshot is
//! written with bincode; an unreadable or foreign-version file means a fresh
//! start.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use gear_common::persist::PersistedGear;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SimError;

/// Saved record of one gear instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGear {
    /// Instance name (for matching on load).
    pub name: String,
    pub record: PersistedGear,
}

/// Snapshot of the whole simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    /// Snapshot format version.
    pub version: u32,
    pub gears: Vec<SavedGear>,
    /// Simulation time at save [s].
    pub sim_time: f32,
}

impl SimSnapshot {
    /// Current snapshot format version.
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            gears: Vec::new(),
            sim_time: 0.0,
        }
    }

    pub fn find(&self, name: &str) -> Option<&PersistedGear> {
        self.gears.iter().find(|g| g.name == name).map(|g| &g.record)
    }
}

/// Reads and writes the gear snapshot file.
#[derive(Debug, Clone)]
pub struct StatePersistence {
    path: PathBuf,
}

impl StatePersistence {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn failure(&self, what: &str, e: impl fmt::Display) -> SimError {
        SimError::Persistence(format!("{what} {}: {e}", self.path.display()))
    }

    /// Write the snapshot, creating parent directories as needed.
    pub fn save(&self, snapshot: &SimSnapshot) -> Result<(), SimError> {
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.failure("cannot prepare directory for", e))?;
        }

        let mut writer = File::create(&self.path)
            .map(BufWriter::new)
            .map_err(|e| self.failure("cannot write gear snapshot", e))?;
        bincode::serialize_into(&mut writer, snapshot)
            .map_err(|e| self.failure("cannot encode gear snapshot", e))?;
        writer
            .flush()
            .map_err(|e| self.failure("cannot write gear snapshot", e))?;

        info!(
            path = %self.path.display(),
            "gear snapshot saved: {} gears at t={:.2}s",
            snapshot.gears.len(),
            snapshot.sim_time
        );
        Ok(())
    }

    /// Read the snapshot. `Ok(None)` when there is nothing usable to restore.
    pub fn load(&self) -> Result<Option<SimSnapshot>, SimError> {
        let reader = match File::open(&self.path) {
            Ok(file) => BufReader::new(file),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no gear snapshot, gears keep their defaults");
                return Ok(None);
            }
            Err(e) => return Err(self.failure("cannot read gear snapshot", e)),
        };

        let snapshot: SimSnapshot = match bincode::deserialize_from(reader) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %self.path.display(), "gear snapshot unreadable, ignoring it: {e}");
                return Ok(None);
            }
        };

        match snapshot.version {
            SimSnapshot::CURRENT_VERSION => {
                info!(
                    path = %self.path.display(),
                    "gear snapshot from t={:.2}s: {} gears",
                    snapshot.sim_time,
                    snapshot.gears.len()
                );
                Ok(Some(snapshot))
            }
            other => {
                warn!(
                    path = %self.path.display(),
                    "gear snapshot format {other} is not {}, ignoring it",
                    SimSnapshot::CURRENT_VERSION
                );
                Ok(None)
            }
        }
    }

    /// Delete the snapshot file if present.
    pub fn clear(&self) -> Result<(), SimError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "gear snapshot removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.failure("cannot remove gear snapshot", e)),
        }
    }
}
