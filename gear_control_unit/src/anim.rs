//! Animation port and completion channel.
//!
//! The animation player is owned by the host. The controller only requests
//! playback states and is told once when playback naturally completes.
//! Completion travels through a single-slot channel the controller subscribes
//! to at setup; the newest unconsumed completion occupies the slot.

use std::cell::Cell;
use std::rc::Rc;

use gear_common::state::AnimState;
use tracing::debug;

/// Playback service driving the leg deploy/retract animation.
pub trait AnimationPort {
    /// Fire-and-forget request to play, reverse, or jump.
    fn request_state(&mut self, target: AnimState);

    /// Current playback state.
    fn current_state(&self) -> AnimState;
}

impl<T: AnimationPort + ?Sized> AnimationPort for Box<T> {
    fn request_state(&mut self, target: AnimState) {
        (**self).request_state(target);
    }

    fn current_state(&self) -> AnimState {
        (**self).current_state()
    }
}

type Slot = Rc<Cell<Option<AnimState>>>;

/// Create a connected completion sender/receiver pair.
pub fn completion_channel() -> (CompletionSender, CompletionReceiver) {
    let slot: Slot = Rc::new(Cell::new(None));
    (
        CompletionSender { slot: slot.clone() },
        CompletionReceiver { slot },
    )
}

/// Host side of the completion channel, held by the animation player.
#[derive(Debug, Clone)]
pub struct CompletionSender {
    slot: Slot,
}

impl CompletionSender {
    /// Report that playback reached `reached` naturally.
    pub fn notify(&self, reached: AnimState) {
        if let Some(stale) = self.slot.replace(Some(reached)) {
            debug!("unconsumed completion {stale:?} replaced by {reached:?}");
        }
    }
}

/// Controller side of the completion channel.
#[derive(Debug)]
pub struct CompletionReceiver {
    slot: Slot,
}

impl CompletionReceiver {
    /// Take the pending completion, if any.
    #[inline]
    pub fn take(&self) -> Option<AnimState> {
        self.slot.take()
    }
}
