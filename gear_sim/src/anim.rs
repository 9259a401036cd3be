//! Simulated animation player.
//!
//! Plays a normalized 0..1 deploy clip. Playing states advance with
//! `update(dt)`; reaching an end stops the clip and notifies the completion
//! channel once. A new request replaces the current playback, so an
//! interrupted clip never reports completion.

use gear_common::state::AnimState;
use gear_control_unit::anim::{AnimationPort, CompletionSender};
use tracing::trace;

/// Animation player with a fixed clip length.
#[derive(Debug)]
pub struct SimAnimator {
    state: AnimState,
    /// 0 = retracted pose, 1 = deployed pose.
    progress: f32,
    length: f32,
    sender: CompletionSender,
}

impl SimAnimator {
    /// Create a player stopped at the retracted pose.
    pub fn new(length: f32, sender: CompletionSender) -> Self {
        Self {
            state: AnimState::StoppedStart,
            progress: 0.0,
            length: length.max(f32::EPSILON),
            sender,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Advance playback by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let step = dt.max(0.0) / self.length;
        match self.state {
            AnimState::PlayingForward => {
                self.progress = (self.progress + step).min(1.0);
                if self.progress >= 1.0 {
                    self.finish(AnimState::StoppedEnd);
                }
            }
            AnimState::PlayingBackward => {
                self.progress = (self.progress - step).max(0.0);
                if self.progress <= 0.0 {
                    self.finish(AnimState::StoppedStart);
                }
            }
            AnimState::StoppedStart | AnimState::StoppedEnd => {}
        }
    }

    fn finish(&mut self, reached: AnimState) {
        self.state = reached;
        trace!("animation reached {reached:?}");
        self.sender.notify(reached);
    }
}

impl AnimationPort for SimAnimator {
    fn request_state(&mut self, target: AnimState) {
        match target {
            AnimState::StoppedStart => self.progress = 0.0,
            AnimState::StoppedEnd => self.progress = 1.0,
            AnimState::PlayingForward | AnimState::PlayingBackward => {}
        }
        self.state = target;
    }

    fn current_state(&self) -> AnimState {
        self.state
    }
}
