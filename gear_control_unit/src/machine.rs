//! GearState transitions.
//!
//! Retracted → Deploying → Deployed → Retracting (decompress, then animate)
//! → Retracted, with Broken reachable from anywhere and left only via repair.
//!
//! Pure: the machine decides the next state and the effect to perform; the
//! controller performs it.

use gear_common::state::{AnimState, GearState, HostMode};

/// Event that can trigger a GearState transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearEvent {
    /// Deploy command.
    Deploy,
    /// Retract command.
    Retract,
    /// Repair command.
    Repair,
    /// External failure (collision, damage).
    Fail,
    /// Animation player finished naturally in the given state.
    AnimDone(AnimState),
    /// Decompression window closed.
    DecompressionFinished,
}

/// Side effect attached to an accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearEffect {
    /// Nothing beyond the component policy of the new state.
    None,
    /// Play the deploy animation.
    PlayForward,
    /// Play the retract animation.
    PlayBackward,
    /// Jump to the deployed pose.
    JumpToEnd,
    /// Jump to the retracted pose.
    JumpToStart,
    /// Open the decompression window; the retract animation waits for it.
    BeginDecompression,
    /// Drop a stale decompression countdown.
    CancelDecompression,
}

impl GearEffect {
    /// Animation request carried by this effect, if any.
    pub const fn animation(&self) -> Option<AnimState> {
        match self {
            Self::PlayForward => Some(AnimState::PlayingForward),
            Self::PlayBackward => Some(AnimState::PlayingBackward),
            Self::JumpToEnd => Some(AnimState::StoppedEnd),
            Self::JumpToStart => Some(AnimState::StoppedStart),
            Self::None | Self::BeginDecompression | Self::CancelDecompression => None,
        }
    }
}

/// Result of a gear transition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearTransition {
    /// Transition accepted.
    Ok {
        from: GearState,
        to: GearState,
        effect: GearEffect,
    },
    /// Event ignored, with the reason.
    Ignored(&'static str),
}

impl GearTransition {
    /// New state if the transition was accepted.
    pub const fn new_state(&self) -> Option<GearState> {
        match self {
            Self::Ok { to, .. } => Some(*to),
            Self::Ignored(_) => None,
        }
    }

    #[inline]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// Conditions outside the gear state the table depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionContext {
    pub mode: HostMode,
    /// A decompression countdown is pending.
    pub decompress_pending: bool,
}

/// Gear state holder.
#[derive(Debug, Clone)]
pub struct GearStateMachine {
    state: GearState,
}

impl GearStateMachine {
    pub const fn new(initial: GearState) -> Self {
        Self { state: initial }
    }

    #[inline]
    pub const fn state(&self) -> GearState {
        self.state
    }

    /// Overwrite the state without running the table (load/start only).
    pub(crate) fn force(&mut self, state: GearState) {
        self.state = state;
    }

    /// Attempt a transition given an event.
    pub fn handle_event(&mut self, event: GearEvent, ctx: TransitionContext) -> GearTransition {
        use GearEffect::*;
        use GearEvent::*;
        use GearState::*;

        let editor = ctx.mode == HostMode::Editor;
        let from = self.state;

        let (to, effect) = match (from, event) {
            // any non-Broken → Broken
            (Broken, Fail) => return GearTransition::Ignored("already broken"),
            (_, Fail) => (Broken, JumpToStart),

            // Broken → Retracted only via repair
            (Broken, Repair) => (Retracted, JumpToStart),
            (_, Repair) => return GearTransition::Ignored("repair requires Broken"),
            (Broken, _) => return GearTransition::Ignored("gear is broken"),

            // Retracted/Retracting → Deploying
            (Retracted | Retracting, Deploy) if editor => (Deployed, JumpToEnd),
            (Retracted | Retracting, Deploy) => (Deploying, PlayForward),
            (Deploying | Deployed, Deploy) => {
                return GearTransition::Ignored("already deploying or deployed");
            }

            // Deploying with a stale countdown collapses back to Deployed
            (Deploying, Retract) if ctx.decompress_pending => (Deployed, CancelDecompression),
            (Deploying | Deployed, Retract) if editor => (Retracted, JumpToStart),
            (Deployed, Retract) => (Retracting, BeginDecompression),
            (Deploying, Retract) => (Retracting, PlayBackward),
            (Retracting | Retracted, Retract) => {
                return GearTransition::Ignored("already retracting or retracted");
            }

            // Animation completion
            (Deploying, AnimDone(AnimState::StoppedEnd)) => (Deployed, None),
            (Retracting, AnimDone(AnimState::StoppedStart)) if ctx.decompress_pending => {
                return GearTransition::Ignored("retract animation not started yet");
            }
            (Retracting, AnimDone(AnimState::StoppedStart)) => (Retracted, None),
            (_, AnimDone(_)) => {
                return GearTransition::Ignored("completion does not match state");
            }

            // Decompression window closed → start the retract animation
            (Retracting, DecompressionFinished) => (Retracting, PlayBackward),
            (_, DecompressionFinished) => {
                return GearTransition::Ignored("no decompression in progress");
            }
        };

        self.state = to;
        GearTransition::Ok { from, to, effect }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
