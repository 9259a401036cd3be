//! Landing gear controller.
//!
//! Owns the gear state machine, the bound legs, the decompression window and
//! the animation port. Commands and completions run the transition table;
//! `fixed_update` runs suspension or decompression for every leg once per
//! physics tick.
//!
//! ## Component policy
//! Wheel physics on only while Deployed (and through the decompression window
//! that follows a retract), foot colliders on only while in transit, all off
//! while the module is disabled.
//!
//! ## Reload
//! `restore` loads a save record verbatim; `start` collapses in-flight states
//! to their stable endpoint. Commands may arrive in between.

use std::sync::Arc;

use gear_common::config::GearConfig;
use gear_common::persist::PersistedGear;
use gear_common::state::{AnimState, GearCommand, GearState, HostMode, LegComponents};
use heapless::Vec as FixedVec;
use tracing::{debug, info, trace, warn};

use crate::anim::{AnimationPort, CompletionReceiver};
use crate::decompress::{DecompressStep, DecompressionSequencer};
use crate::leg::{LegSet, LegSetupReport, LegUnit, build_legs};
use crate::machine::{GearEffect, GearEvent, GearStateMachine, GearTransition, TransitionContext};
use crate::scene::{Raycaster, SceneLookup};
use crate::suspension::simulate_leg;

/// Commands currently offered to the user, with their labels.
pub type VisibleCommands<'a> = FixedVec<(GearCommand, &'a str), 3>;

/// Deployable multi-leg landing gear.
pub struct GearController<A: AnimationPort> {
    config: Arc<GearConfig>,
    machine: GearStateMachine,
    decompression: DecompressionSequencer,
    legs: LegSet,
    animation: A,
    completions: Option<CompletionReceiver>,
    mode: HostMode,
    part_scale: f32,
    module_enabled: bool,
    controllable: bool,
    started: bool,
    applied: LegComponents,
}

impl<A: AnimationPort> GearController<A> {
    /// Create a controller in `Retracted` with no legs bound.
    pub fn new(config: Arc<GearConfig>, animation: A, mode: HostMode) -> Self {
        Self {
            config,
            machine: GearStateMachine::new(GearState::Retracted),
            decompression: DecompressionSequencer::new(),
            legs: LegSet::new(),
            animation,
            completions: None,
            mode,
            part_scale: 1.0,
            module_enabled: true,
            controllable: true,
            started: false,
            applied: LegComponents::empty(),
        }
    }

    // ─── Setup ──────────────────────────────────────────────────────

    /// Bind the configured legs from the scene.
    pub fn setup(&mut self, scene: &dyn SceneLookup) -> LegSetupReport {
        let (legs, report) = build_legs(&self.config, scene);
        self.legs = legs;
        self.apply_policy();
        report
    }

    /// Subscribe to the animation player's completion channel.
    pub fn subscribe(&mut self, receiver: CompletionReceiver) {
        if self.completions.replace(receiver).is_some() {
            warn!(gear = %self.config.name, "completion channel replaced");
        }
    }

    /// Load a save record as-is. In-flight states are kept until `start`.
    pub fn restore(&mut self, record: &PersistedGear) {
        let (state, countdown) = record.decode_or_default();
        self.machine.force(state);
        self.decompression.restore(countdown);
        self.started = false;
        info!(
            gear = %self.config.name,
            "restored {state} (decompress {countdown:.2}s)"
        );
    }

    /// Begin live operation: settle in-flight states and sync the animation.
    pub fn start(&mut self) {
        let state = self.machine.state();
        let settled = state.settled();
        if settled != state {
            info!(gear = %self.config.name, "{state} collapsed to {settled} on start");
            self.machine.force(settled);
        }
        self.decompression.cancel();
        self.apply_policy();
        let pose = if settled == GearState::Deployed {
            AnimState::StoppedEnd
        } else {
            AnimState::StoppedStart
        };
        self.request_animation(pose);
        self.started = true;
    }

    /// Save record for the current state.
    pub fn save(&self) -> PersistedGear {
        PersistedGear::new(self.machine.state())
    }

    // ─── Commands ───────────────────────────────────────────────────

    pub fn deploy(&mut self) -> GearTransition {
        self.command(GearEvent::Deploy)
    }

    pub fn retract(&mut self) -> GearTransition {
        self.command(GearEvent::Retract)
    }

    pub fn repair(&mut self) -> GearTransition {
        self.command(GearEvent::Repair)
    }

    /// Deploy or retract depending on the current state.
    pub fn toggle(&mut self) -> GearTransition {
        match self.machine.state() {
            GearState::Deployed | GearState::Deploying => self.retract(),
            GearState::Retracted | GearState::Retracting => self.deploy(),
            GearState::Broken => GearTransition::Ignored("gear is broken"),
        }
    }

    pub fn execute(&mut self, command: GearCommand) -> GearTransition {
        match command {
            GearCommand::Deploy => self.deploy(),
            GearCommand::Retract => self.retract(),
            GearCommand::Repair => self.repair(),
            GearCommand::Toggle => self.toggle(),
        }
    }

    /// Route an action-group binding to `toggle` if it is ours.
    pub fn on_action(&mut self, binding: &str) -> GearTransition {
        if binding.eq_ignore_ascii_case(&self.config.action_group) {
            self.toggle()
        } else {
            GearTransition::Ignored("unbound action")
        }
    }

    /// External failure signal. Always lands in `Broken`.
    pub fn fail(&mut self) -> GearTransition {
        self.dispatch(GearEvent::Fail)
    }

    fn command(&mut self, event: GearEvent) -> GearTransition {
        if !self.controllable {
            trace!(gear = %self.config.name, "{event:?} ignored: not controllable");
            return GearTransition::Ignored("not controllable");
        }
        self.dispatch(event)
    }

    // ─── Gating ─────────────────────────────────────────────────────

    pub fn enable(&mut self) {
        self.module_enabled = true;
        self.apply_policy();
    }

    /// Pause the module: all physics off, state preserved. Commands still
    /// run the transition table; the tick is suspended until `enable`.
    pub fn disable(&mut self) {
        self.module_enabled = false;
        self.apply_policy();
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.module_enabled
    }

    pub fn set_controllable(&mut self, controllable: bool) {
        self.controllable = controllable;
    }

    #[inline]
    pub fn is_controllable(&self) -> bool {
        self.controllable
    }

    // ─── Animation ──────────────────────────────────────────────────

    /// Animation player reached `reached` naturally.
    pub fn on_anim_done(&mut self, reached: AnimState) -> GearTransition {
        self.dispatch(GearEvent::AnimDone(reached))
    }

    /// Drain the subscribed completion channel.
    pub fn pump_completions(&mut self) -> Option<GearTransition> {
        let reached = self.completions.as_ref()?.take()?;
        Some(self.on_anim_done(reached))
    }

    fn request_animation(&mut self, target: AnimState) {
        if self.animation.current_state() == target {
            trace!(gear = %self.config.name, "animation already {target:?}");
            return;
        }
        // A completion still queued belongs to the request being replaced.
        if let Some(stale) = self.completions.as_ref().and_then(CompletionReceiver::take) {
            debug!(gear = %self.config.name, "dropped stale completion {stale:?}");
        }
        debug!(gear = %self.config.name, "animation → {target:?}");
        self.animation.request_state(target);
    }

    // ─── Tick ───────────────────────────────────────────────────────

    /// One fixed physics tick.
    ///
    /// Legs are positioned before any transition caused by this tick's own
    /// timer expiry, and that transition completes within the same tick.
    pub fn fixed_update(&mut self, dt: f32, raycaster: &dyn Raycaster) {
        self.pump_completions();

        if !self.started || self.mode == HostMode::Editor || !self.module_enabled {
            return;
        }

        match self.machine.state() {
            GearState::Deployed => {
                let scale = self.part_scale;
                for leg in self.legs.iter_mut() {
                    simulate_leg(leg, scale, raycaster);
                }
            }
            GearState::Retracting => {
                if self.decompression.step(dt, self.legs.iter_mut()) == DecompressStep::Finished {
                    self.dispatch(GearEvent::DecompressionFinished);
                }
            }
            _ => {}
        }
    }

    // ─── Transition plumbing ────────────────────────────────────────

    fn dispatch(&mut self, event: GearEvent) -> GearTransition {
        let ctx = TransitionContext {
            mode: self.mode,
            decompress_pending: self.decompression.is_active(),
        };
        let transition = self.machine.handle_event(event, ctx);

        match transition {
            GearTransition::Ok { from, to, effect } => {
                if effect == GearEffect::BeginDecompression {
                    self.decompression.start(self.config.decompress_duration);
                } else if self.decompression.is_active() {
                    debug!(gear = %self.config.name, "decompression cancelled by {event:?}");
                    self.decompression.cancel();
                }

                self.apply_policy();

                if let Some(target) = effect.animation() {
                    self.request_animation(target);
                }

                if from != to {
                    info!(gear = %self.config.name, "{from} → {to} ({event:?})");
                } else {
                    debug!(gear = %self.config.name, "{to}: {effect:?}");
                }
            }
            GearTransition::Ignored(reason) => {
                let state = self.machine.state();
                if matches!(event, GearEvent::AnimDone(_)) {
                    debug!(gear = %self.config.name, "{event:?} ignored in {state}: {reason}");
                } else {
                    trace!(gear = %self.config.name, "{event:?} ignored in {state}: {reason}");
                }
            }
        }

        transition
    }

    /// Enable exactly the components the current state calls for.
    fn apply_policy(&mut self) {
        let state = self.machine.state();
        let wanted = if !self.module_enabled {
            LegComponents::empty()
        } else if state == GearState::Retracting && self.decompression.is_active() {
            state.component_policy() | LegComponents::WHEEL_PHYSICS
        } else {
            state.component_policy()
        };

        for leg in self.legs.iter_mut() {
            leg.apply_components(wanted);
        }
        self.applied = wanted;
    }

    // ─── Accessors ──────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> GearState {
        self.machine.state()
    }

    /// Seconds left in the decompression window.
    #[inline]
    pub fn decompress_remaining(&self) -> f32 {
        self.decompression.remaining()
    }

    pub fn legs(&self) -> &[LegUnit] {
        &self.legs
    }

    /// Components the controller last applied to every leg.
    pub fn applied_components(&self) -> LegComponents {
        self.applied
    }

    pub fn config(&self) -> &Arc<GearConfig> {
        &self.config
    }

    pub fn mode(&self) -> HostMode {
        self.mode
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut A {
        &mut self.animation
    }

    pub fn part_scale(&self) -> f32 {
        self.part_scale
    }

    /// Set the part rescale factor applied to suspension reach.
    pub fn set_part_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.part_scale = scale;
        } else {
            warn!(gear = %self.config.name, "ignoring invalid part scale {scale}");
        }
    }

    /// Commands the user can issue right now, with their labels.
    pub fn visible_commands(&self) -> VisibleCommands<'_> {
        let mut visible = VisibleCommands::new();
        if !self.module_enabled || !self.controllable {
            return visible;
        }
        let labels = &self.config.labels;
        let entry = match self.machine.state() {
            GearState::Retracted | GearState::Retracting => (GearCommand::Deploy, labels.deploy.as_str()),
            GearState::Deployed | GearState::Deploying => (GearCommand::Retract, labels.retract.as_str()),
            GearState::Broken => (GearCommand::Repair, labels.repair.as_str()),
        };
        let _ = visible.push(entry);
        visible
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
