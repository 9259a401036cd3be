//! Host simulation loop.
//!
//! Builds one controller per configured gear instance, restores saved state,
//! then runs fixed ticks: timeline actions first, then the animation frame,
//! then the controller's physics tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use gear_common::state::{GearState, LegComponents};
use gear_control_unit::anim::completion_channel;
use gear_control_unit::controller::GearController;
use gear_control_unit::machine::GearTransition;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::anim::SimAnimator;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::persist::{SavedGear, SimSnapshot, StatePersistence};
use crate::timeline::{SimAction, Timeline};
use crate::world::{FlatGround, SimScene};

/// One gear module in the world.
pub struct GearInstance {
    pub name: String,
    pub controller: GearController<SimAnimator>,
    pub scene: SimScene,
    transitions: u32,
}

impl GearInstance {
    /// Perform a timeline action. Gating actions carry no transition.
    fn apply(&mut self, action: &SimAction) -> Option<GearTransition> {
        match action {
            SimAction::Command(command) => Some(self.controller.execute(*command)),
            SimAction::Fail => Some(self.controller.fail()),
            SimAction::Binding(binding) => Some(self.controller.on_action(binding)),
            SimAction::Enable => {
                self.controller.enable();
                None
            }
            SimAction::Disable => {
                self.controller.disable();
                None
            }
        }
    }

    fn report(&self) -> GearReport {
        let legs = self.controller.legs();
        GearReport {
            name: self.name.clone(),
            state: self.controller.state(),
            enabled: self.controller.is_enabled(),
            active_legs: legs.len(),
            configured_legs: self.controller.config().leg_count(),
            components: self.scene.enabled_components().bits(),
            decompress_remaining: self.controller.decompress_remaining(),
            animation_progress: self.controller.animation().progress(),
            transitions: self.transitions,
        }
    }
}

/// Final state of one gear instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GearReport {
    pub name: String,
    pub state: GearState,
    pub enabled: bool,
    pub active_legs: usize,
    pub configured_legs: usize,
    /// `LegComponents` bits enabled anywhere in the instance's scene.
    pub components: u8,
    pub decompress_remaining: f32,
    pub animation_progress: f32,
    /// State changes observed during the run.
    pub transitions: u32,
}

impl GearReport {
    pub fn components(&self) -> LegComponents {
        LegComponents::from_bits_truncate(self.components)
    }
}

/// Outcome of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub ticks: u64,
    pub sim_time: f32,
    pub gears: Vec<GearReport>,
}

impl SimReport {
    pub fn gear(&self, name: &str) -> Option<&GearReport> {
        self.gears.iter().find(|g| g.name == name)
    }
}

/// The simulated world.
pub struct Simulation {
    gears: Vec<GearInstance>,
    ground: FlatGround,
    timeline: Timeline,
    dt: f32,
    tick_count: u64,
    sim_time: f32,
    running: Arc<AtomicBool>,
    persistence: Option<StatePersistence>,
}

impl Simulation {
    /// Build the world from a validated configuration and restore saved state.
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let parts = config.part_table();
        let timeline = Timeline::from_entries(&config.timeline)?;
        let persistence = config.sim.state_file.as_ref().map(StatePersistence::new);
        let snapshot = match &persistence {
            Some(p) => p.load()?,
            None => None,
        };

        let mut gears = Vec::with_capacity(config.gears.len());
        for instance in &config.gears {
            let part = parts
                .get(&instance.part)
                .ok_or_else(|| SimError::UnknownPart {
                    gear: instance.name.clone(),
                    part: instance.part.clone(),
                })?;

            let scene = SimScene::for_part(part, instance, config.sim.ground_height);
            let (sender, receiver) = completion_channel();
            let animator = SimAnimator::new(config.sim.anim_length, sender);

            let mut controller = GearController::new(Arc::clone(part), animator, instance.mode);
            controller.set_part_scale(instance.scale);
            controller.subscribe(receiver);
            let report = controller.setup(&scene);
            if !report.rejected.is_empty() {
                warn!(
                    gear = %instance.name,
                    "{} of {} legs unavailable",
                    report.rejected.len(),
                    report.configured
                );
            }

            if let Some(record) = snapshot.as_ref().and_then(|s| s.find(&instance.name)) {
                controller.restore(record);
            }
            controller.start();
            info!(gear = %instance.name, "ready in {}", controller.state());

            gears.push(GearInstance {
                name: instance.name.clone(),
                controller,
                scene,
                transitions: 0,
            });
        }

        info!(
            "Simulation built: {} gears, {} timeline actions, dt={}s",
            gears.len(),
            timeline.len(),
            config.sim.dt()
        );

        Ok(Self {
            gears,
            ground: FlatGround {
                height: config.sim.ground_height,
            },
            timeline,
            dt: config.sim.dt(),
            tick_count: 0,
            sim_time: 0.0,
            running: Arc::new(AtomicBool::new(false)),
            persistence,
        })
    }

    /// Get running flag for signal handling.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn gears(&self) -> &[GearInstance] {
        &self.gears
    }

    pub fn gear_mut(&mut self, name: &str) -> Option<&mut GearInstance> {
        self.gears.iter_mut().find(|g| g.name == name)
    }

    pub fn sim_time(&self) -> f32 {
        self.sim_time
    }

    /// Advance the world by one fixed tick.
    pub fn tick(&mut self) {
        let now = self.sim_time;
        for scheduled in self.timeline.due(now) {
            for gear in self.gears.iter_mut().filter(|g| scheduled.targets(&g.name)) {
                let before = gear.controller.state();
                let transition = gear.apply(&scheduled.action);
                if gear.controller.state() != before {
                    gear.transitions += 1;
                }
                debug!(gear = %gear.name, "t={now:.2}s {:?} → {transition:?}", scheduled.action);
            }
        }

        for gear in &mut self.gears {
            let before = gear.controller.state();
            gear.controller.animation_mut().update(self.dt);
            gear.controller.fixed_update(self.dt, &self.ground);
            if gear.controller.state() != before {
                gear.transitions += 1;
            }
        }

        self.tick_count += 1;
        self.sim_time = self.tick_count as f32 * self.dt;
    }

    /// Run up to `ticks` ticks, optionally paced to wall-clock time.
    ///
    /// Stops early when the running flag is cleared.
    pub fn run(&mut self, ticks: u64, realtime: bool) -> SimReport {
        let period = Duration::from_secs_f32(self.dt);
        self.running.store(true, Ordering::SeqCst);
        info!("Running {ticks} ticks (realtime={realtime})");

        for _ in 0..ticks {
            if !self.running.load(Ordering::SeqCst) {
                info!("Stopped at tick {}", self.tick_count);
                break;
            }
            let tick_start = Instant::now();
            self.tick();

            if realtime {
                let elapsed = tick_start.elapsed();
                if elapsed < period {
                    std::thread::sleep(period - elapsed);
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        self.report()
    }

    pub fn report(&self) -> SimReport {
        SimReport {
            ticks: self.tick_count,
            sim_time: self.sim_time,
            gears: self.gears.iter().map(GearInstance::report).collect(),
        }
    }

    /// Current state of every gear as a snapshot.
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            gears: self
                .gears
                .iter()
                .map(|g| SavedGear {
                    name: g.name.clone(),
                    record: g.controller.save(),
                })
                .collect(),
            sim_time: self.sim_time,
            ..SimSnapshot::new()
        }
    }

    /// Save state if a state file is configured.
    pub fn shutdown(&self) -> Result<(), SimError> {
        match &self.persistence {
            Some(persistence) => persistence.save(&self.snapshot()),
            None => Ok(()),
        }
    }
}
