//! Decompression window before retraction.
//!
//! A deployed leg's suspension node usually sits compressed above the wheel.
//! Before the retract animation starts, the node is eased back onto the wheel
//! over a fixed window; the animation only starts once the window closes.

use tracing::trace;

use crate::leg::LegUnit;

/// Remaining time below which the window counts as closed [s].
const CLOSE_EPSILON: f32 = 1e-5;

/// Outcome of one decompression tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressStep {
    /// No window active.
    Idle,
    /// Window still open.
    Running,
    /// Window closed this tick; nodes are flush with their wheels.
    Finished,
}

/// Countdown plus per-tick interpolation of suspension nodes.
#[derive(Debug, Clone, Default)]
pub struct DecompressionSequencer {
    remaining: f32,
}

impl DecompressionSequencer {
    pub const fn new() -> Self {
        Self { remaining: 0.0 }
    }

    /// Seconds left in the window (0 when inactive).
    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Open a window of `duration` seconds.
    pub fn start(&mut self, duration: f32) {
        self.remaining = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
    }

    /// Close the window without touching the legs.
    pub fn cancel(&mut self) {
        self.remaining = 0.0;
    }

    /// Restore a countdown from a legacy save record.
    pub(crate) fn restore(&mut self, remaining: f32) {
        self.start(remaining);
    }

    /// Advance the window by `dt`, easing every node toward its wheel.
    pub fn step<'a, I>(&mut self, dt: f32, legs: I) -> DecompressStep
    where
        I: IntoIterator<Item = &'a mut LegUnit>,
    {
        if !self.is_active() {
            return DecompressStep::Idle;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let percent = (dt / self.remaining).clamp(0.0, 1.0);
        self.remaining -= dt;
        let finished = self.remaining <= CLOSE_EPSILON;

        for leg in legs {
            let target = leg.wheel_position();
            let position = if finished {
                target
            } else {
                let current = leg.suspension_position();
                current + (target - current) * percent
            };
            leg.set_suspension_position(position);
        }

        if finished {
            self.remaining = 0.0;
            trace!("decompression window closed");
            DecompressStep::Finished
        } else {
            DecompressStep::Running
        }
    }
}
