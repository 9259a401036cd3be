//! Gear Common Library
//!
//! Shared types for the landing gear workspace.
//!
//! # Module Structure
//!
//! - [`state`] - Gear/animation state enums, commands, component flags
//! - [`config`] - Configuration loading trait and the per-part `GearConfig`
//! - [`persist`] - Versioned save-file record
//! - [`error`] - Error types
//! - [`consts`] - Limits and defaults
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use gear_common::prelude::*;
//!
//! let state: GearState = "deployed".parse().unwrap();
//! assert_eq!(state.component_policy(), LegComponents::WHEEL_PHYSICS);
//! ```

pub mod config;
pub mod consts;
pub mod error;
pub mod persist;
pub mod prelude;
pub mod state;
