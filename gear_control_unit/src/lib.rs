//! # Gear Control Unit Library
//!
//! Controller for a deployable multi-leg landing gear. Owns the gear state
//! machine, binds legs from the host scene, runs raycast suspension while
//! deployed and eases the legs back onto their wheels before retracting.
//!
//! ## Layers
//!
//! 1. **GearStateMachine** - pure transition table (`machine`)
//! 2. **GearController** - effects, component policy, tick (`controller`)
//! 3. **LegUnit** - bound scene handles per leg (`leg`)
//! 4. **Suspension / Decompression** - per-tick leg positioning
//!
//! ## Host seams
//!
//! The host provides scene lookup, ray queries and the animation player
//! through the traits in [`scene`] and [`anim`]. Nothing here owns a thread;
//! the host calls into the controller from its own update and physics loops.

pub mod anim;
pub mod controller;
pub mod decompress;
pub mod leg;
pub mod machine;
pub mod scene;
pub mod suspension;


pub use anim::{AnimationPort, CompletionReceiver, CompletionSender, completion_channel};
pub use controller::{GearController, VisibleCommands};
pub use leg::{LegSetupReport, LegUnit};
pub use machine::{GearEffect, GearEvent, GearTransition};
