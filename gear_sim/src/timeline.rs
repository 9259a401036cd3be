//! Scripted timeline.
//!
//! Entries fire once, in time order, on the first tick whose simulation time
//! reaches them.

use std::str::FromStr;

use gear_common::state::GearCommand;

use crate::config::TimelineEntry;
use crate::error::SimError;

/// Action a timeline entry performs on a gear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimAction {
    /// User command (deploy, retract, repair, toggle).
    Command(GearCommand),
    /// External failure signal.
    Fail,
    /// Re-enable the gear module.
    Enable,
    /// Disable the gear module.
    Disable,
    /// Action-group binding by name.
    Binding(String),
}

impl FromStr for SimAction {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(binding) = s.strip_prefix("action:") {
            let binding = binding.trim();
            if binding.is_empty() {
                return Err(SimError::Timeline("empty action binding".to_string()));
            }
            return Ok(Self::Binding(binding.to_string()));
        }
        match s.to_ascii_lowercase().as_str() {
            "deploy" => Ok(Self::Command(GearCommand::Deploy)),
            "retract" => Ok(Self::Command(GearCommand::Retract)),
            "repair" => Ok(Self::Command(GearCommand::Repair)),
            "toggle" => Ok(Self::Command(GearCommand::Toggle)),
            "fail" => Ok(Self::Fail),
            "enable" => Ok(Self::Enable),
            "disable" => Ok(Self::Disable),
            other => Err(SimError::Timeline(format!("unknown action '{other}'"))),
        }
    }
}

/// A parsed timeline entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledAction {
    pub at: f32,
    pub action: SimAction,
    /// Target instance; all instances when `None`.
    pub gear: Option<String>,
}

impl ScheduledAction {
    pub fn targets(&self, gear: &str) -> bool {
        self.gear.as_deref().is_none_or(|g| g == gear)
    }
}

/// Time-ordered action list with a cursor.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    actions: Vec<ScheduledAction>,
    cursor: usize,
}

impl Timeline {
    /// Parse and sort the configured entries. Equal times keep file order.
    pub fn from_entries(entries: &[TimelineEntry]) -> Result<Self, SimError> {
        let mut actions = entries
            .iter()
            .map(|entry| {
                Ok(ScheduledAction {
                    at: entry.at,
                    action: entry.action.parse()?,
                    gear: entry.gear.clone(),
                })
            })
            .collect::<Result<Vec<_>, SimError>>()?;
        actions.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(Self { actions, cursor: 0 })
    }

    /// Actions that became due at or before `now`, each returned once.
    pub fn due(&mut self, now: f32) -> &[ScheduledAction] {
        let start = self.cursor;
        while self
            .actions
            .get(self.cursor)
            .is_some_and(|a| a.at <= now)
        {
            self.cursor += 1;
        }
        &self.actions[start..self.cursor]
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions not yet fired.
    pub fn remaining(&self) -> usize {
        self.actions.len() - self.cursor
    }
}
