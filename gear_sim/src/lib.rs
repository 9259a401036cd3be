//! # Gear Simulation Library
//!
//! Host simulation for the landing gear controller: an in-memory scene, a
//! flat ground plane, an animation player and a scripted timeline driving
//! one `GearController` per configured gear instance.
//!
//! # Module Structure
//!
//! - [`config`] - `SimConfig` (parts, gear instances, timeline)
//! - [`world`] - `SimScene` and `FlatGround`
//! - [`anim`] - `SimAnimator` animation player
//! - [`timeline`] - Scripted actions
//! - [`persist`] - Binary state file
//! - [`simulation`] - Fixed-tick loop and run report
//! - [`error`] - `SimError`
//!
//! # Tick order
//!
//! ```text
//!  timeline actions ──► animation update ──► controller.fixed_update
//!                             │                      ▲
//!                             └── completion slot ───┘
//! ```

pub mod anim;
pub mod config;
pub mod error;
pub mod persist;
pub mod simulation;
pub mod timeline;
pub mod world;

pub use config::SimConfig;
pub use error::SimError;
pub use simulation::{SimReport, Simulation};
