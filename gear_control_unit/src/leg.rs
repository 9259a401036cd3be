//! LegUnit binding and setup.
//!
//! Each configured leg index resolves a suspension node, a wheel-physics
//! node, and optionally a foot collider from the live scene. Legs that do not
//! resolve are logged and left out; the gear runs on the rest.

use gear_common::config::{GearConfig, PhysicalOverrides};
use gear_common::consts::MAX_LEGS;
use gear_common::error::LegSetupError;
use gear_common::state::LegComponents;
use glam::Vec3;
use heapless::Vec as FixedVec;
use tracing::{debug, info, warn};

use crate::scene::{FootCollider, SceneLookup, SceneNode, SuspensionSpring, WheelPhysics};

/// Active legs of one gear module.
pub type LegSet = FixedVec<LegUnit, MAX_LEGS>;

/// One physical leg.
///
/// Component enable flags are only reachable from inside this crate, so the
/// gear controller is the single writer.
pub struct LegUnit {
    index: usize,
    name: String,
    suspension: Box<dyn SceneNode>,
    foot: Option<Box<dyn FootCollider>>,
    wheel: Box<dyn WheelPhysics>,
    /// Wheel radius [m].
    pub wheel_radius: f32,
    /// Suspension travel [m].
    pub suspension_travel: f32,
    pub suspension_spring: f32,
    pub suspension_damper: f32,
    pub suspension_target_position: f32,
    /// Static offset added to computed compression [m].
    pub suspension_offset: f32,
}

impl std::fmt::Debug for LegUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegUnit")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("has_foot", &self.foot.is_some())
            .field("wheel_radius", &self.wheel_radius)
            .field("suspension_travel", &self.suspension_travel)
            .field("suspension_offset", &self.suspension_offset)
            .finish()
    }
}

impl LegUnit {
    /// Bind a leg and write the configured overrides to its wheel component.
    pub fn new(
        index: usize,
        name: &str,
        suspension: Box<dyn SceneNode>,
        mut wheel: Box<dyn WheelPhysics>,
        foot: Option<Box<dyn FootCollider>>,
        overrides: &PhysicalOverrides,
        suspension_offset: f32,
    ) -> Self {
        let wheel_radius = PhysicalOverrides::resolve(overrides.wheel_radius, wheel.radius());
        let suspension_travel =
            PhysicalOverrides::resolve(overrides.suspension_travel, wheel.suspension_travel());
        let defaults = wheel.spring();
        let spring = SuspensionSpring {
            spring: PhysicalOverrides::resolve(overrides.suspension_spring, defaults.spring),
            damper: PhysicalOverrides::resolve(overrides.suspension_damper, defaults.damper),
            target_position: PhysicalOverrides::resolve(
                overrides.suspension_target,
                defaults.target_position,
            ),
        };

        wheel.set_radius(wheel_radius);
        wheel.set_suspension_travel(suspension_travel);
        wheel.set_spring(spring);

        Self {
            index,
            name: name.to_string(),
            suspension,
            foot,
            wheel,
            wheel_radius,
            suspension_travel,
            suspension_spring: spring.spring,
            suspension_damper: spring.damper,
            suspension_target_position: spring.target_position,
            suspension_offset,
        }
    }

    /// Configured leg index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Suspension node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_foot(&self) -> bool {
        self.foot.is_some()
    }

    pub fn suspension_position(&self) -> Vec3 {
        self.suspension.position()
    }

    pub fn wheel_position(&self) -> Vec3 {
        self.wheel.position()
    }

    pub fn wheel_up(&self) -> Vec3 {
        self.wheel.up()
    }

    pub(crate) fn set_suspension_position(&mut self, position: Vec3) {
        self.suspension.set_position(position);
    }

    /// Components currently enabled on the host side.
    pub fn components(&self) -> LegComponents {
        let mut flags = LegComponents::empty();
        if self.wheel.is_enabled() {
            flags |= LegComponents::WHEEL_PHYSICS;
        }
        if self.foot.as_ref().is_some_and(|f| f.is_enabled()) {
            flags |= LegComponents::FOOT_COLLIDER;
        }
        flags
    }

    pub(crate) fn apply_components(&mut self, wanted: LegComponents) {
        let wheel_on = wanted.contains(LegComponents::WHEEL_PHYSICS);
        if self.wheel.is_enabled() != wheel_on {
            self.wheel.set_enabled(wheel_on);
        }
        if let Some(foot) = self.foot.as_mut() {
            let foot_on = wanted.contains(LegComponents::FOOT_COLLIDER);
            if foot.is_enabled() != foot_on {
                foot.set_enabled(foot_on);
            }
        }
    }
}

// ─── Setup ──────────────────────────────────────────────────────────

/// Outcome of binding the configured legs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegSetupReport {
    /// Legs configured.
    pub configured: usize,
    /// Legs bound into the active set.
    pub active: usize,
    /// Legs left out, with the reason.
    pub rejected: Vec<LegSetupError>,
}

/// Resolve every configured leg against the scene.
pub fn build_legs(config: &GearConfig, scene: &dyn SceneLookup) -> (LegSet, LegSetupReport) {
    let suspension_names = config.suspension_names();
    let wheel_names = config.wheel_names();
    let foot_names = config.foot_names();

    let mut legs = LegSet::new();
    let mut report = LegSetupReport {
        configured: suspension_names.len(),
        ..LegSetupReport::default()
    };

    for index in 0..suspension_names.len() {
        let bound = bind_leg(
            index,
            config,
            scene,
            suspension_names[index],
            wheel_names.get(index).copied(),
            foot_names.get(index).copied(),
        )
        .and_then(|leg| {
            legs.push(leg)
                .map_err(|_| LegSetupError::CapacityExceeded { index, max: MAX_LEGS })
        });

        if let Err(e) = bound {
            warn!(gear = %config.name, "skipping {e}");
            report.rejected.push(e);
        }
    }

    report.active = legs.len();
    info!(
        gear = %config.name,
        "bound {}/{} legs",
        report.active, report.configured
    );
    (legs, report)
}

fn bind_leg(
    index: usize,
    config: &GearConfig,
    scene: &dyn SceneLookup,
    suspension_name: &str,
    wheel_name: Option<&str>,
    foot_name: Option<&str>,
) -> Result<LegUnit, LegSetupError> {
    if suspension_name.is_empty() {
        return Err(LegSetupError::MissingSuspensionName { index });
    }
    let wheel_name = match wheel_name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(LegSetupError::MissingWheelName { index }),
    };

    let suspension = scene
        .find_node(suspension_name)
        .ok_or_else(|| LegSetupError::NodeNotFound {
            index,
            name: suspension_name.to_string(),
        })?;

    if scene.find_node(wheel_name).is_none() {
        return Err(LegSetupError::NodeNotFound {
            index,
            name: wheel_name.to_string(),
        });
    }
    let wheel = scene
        .find_wheel(wheel_name)
        .ok_or_else(|| LegSetupError::NoWheelPhysics {
            index,
            name: wheel_name.to_string(),
        })?;

    let foot = match foot_name.filter(|n| !n.is_empty()) {
        Some(name) => {
            let foot = scene.find_foot(name);
            if foot.is_none() {
                warn!(gear = %config.name, "leg {index}: foot collider '{name}' not found, continuing without");
            }
            foot
        }
        None => None,
    };

    debug!(
        gear = %config.name,
        "leg {index}: suspension='{suspension_name}' wheel='{wheel_name}' foot={}",
        foot.is_some()
    );

    Ok(LegUnit::new(
        index,
        suspension_name,
        suspension,
        wheel,
        foot,
        &config.overrides,
        config.suspension_offset,
    ))
}

// ─── Tests ──────────────────────────────────────────────────────────
