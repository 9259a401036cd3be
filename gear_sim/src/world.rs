//! Simulated scene and ground.
//!
//! Nodes, wheel components and foot colliders live in shared cells; the
//! controller gets handles that read and write the same cells the simulation
//! inspects for its report.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gear_common::config::GearConfig;
use gear_common::state::LegComponents;
use gear_control_unit::scene::{
    FootCollider, Raycaster, SceneLookup, SceneNode, SuspensionSpring, WheelPhysics,
};
use glam::Vec3;
use tracing::debug;

use crate::config::GearInstanceConfig;

// ─── Components ─────────────────────────────────────────────────────

/// Wheel-physics component state.
#[derive(Debug, Clone, PartialEq)]
pub struct SimWheel {
    pub position: Vec3,
    pub up: Vec3,
    pub enabled: bool,
    pub radius: f32,
    pub travel: f32,
    pub spring: SuspensionSpring,
}

impl Default for SimWheel {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            up: Vec3::Y,
            enabled: false,
            radius: 0.3,
            travel: 0.2,
            spring: SuspensionSpring {
                spring: 120.0,
                damper: 12.0,
                target_position: 0.5,
            },
        }
    }
}

struct NodeHandle(Rc<RefCell<Vec3>>);

impl SceneNode for NodeHandle {
    fn position(&self) -> Vec3 {
        *self.0.borrow()
    }
    fn set_position(&mut self, position: Vec3) {
        *self.0.borrow_mut() = position;
    }
}

struct WheelHandle(Rc<RefCell<SimWheel>>);

impl WheelPhysics for WheelHandle {
    fn position(&self) -> Vec3 {
        self.0.borrow().position
    }
    fn up(&self) -> Vec3 {
        self.0.borrow().up
    }
    fn is_enabled(&self) -> bool {
        self.0.borrow().enabled
    }
    fn set_enabled(&mut self, enabled: bool) {
        self.0.borrow_mut().enabled = enabled;
    }
    fn radius(&self) -> f32 {
        self.0.borrow().radius
    }
    fn set_radius(&mut self, radius: f32) {
        self.0.borrow_mut().radius = radius;
    }
    fn suspension_travel(&self) -> f32 {
        self.0.borrow().travel
    }
    fn set_suspension_travel(&mut self, travel: f32) {
        self.0.borrow_mut().travel = travel;
    }
    fn spring(&self) -> SuspensionSpring {
        self.0.borrow().spring
    }
    fn set_spring(&mut self, spring: SuspensionSpring) {
        self.0.borrow_mut().spring = spring;
    }
}

struct FootHandle(Rc<RefCell<bool>>);

impl FootCollider for FootHandle {
    fn is_enabled(&self) -> bool {
        *self.0.borrow()
    }
    fn set_enabled(&mut self, enabled: bool) {
        *self.0.borrow_mut() = enabled;
    }
}

// ─── Scene ──────────────────────────────────────────────────────────

/// Named nodes with optional wheel and foot components.
#[derive(Debug, Default)]
pub struct SimScene {
    nodes: HashMap<String, Rc<RefCell<Vec3>>>,
    wheels: HashMap<String, Rc<RefCell<SimWheel>>>,
    feet: HashMap<String, Rc<RefCell<bool>>>,
}

impl SimScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: &str, position: Vec3) {
        self.nodes
            .insert(name.to_string(), Rc::new(RefCell::new(position)));
    }

    /// Add a node carrying a wheel component.
    pub fn add_wheel(&mut self, name: &str, wheel: SimWheel) {
        self.add_node(name, wheel.position);
        self.wheels
            .insert(name.to_string(), Rc::new(RefCell::new(wheel)));
    }

    /// Add a node carrying a (disabled) foot collider.
    pub fn add_foot(&mut self, name: &str, position: Vec3) {
        self.add_node(name, position);
        self.feet.insert(name.to_string(), Rc::new(RefCell::new(false)));
    }

    /// Lay out one part instance: leg `i` sits at `x = i * spacing` with its
    /// wheel `wheel_height` above `ground_height`. Names listed in
    /// `omit_nodes` are left out.
    pub fn for_part(part: &GearConfig, instance: &GearInstanceConfig, ground_height: f32) -> Self {
        let mut scene = Self::new();
        let omitted = |name: &str| name.is_empty() || instance.omit_nodes.iter().any(|n| n == name);
        let suspension = part.suspension_names();
        let wheels = part.wheel_names();
        let feet = part.foot_names();

        for i in 0..suspension.len() {
            let wheel_at = Vec3::new(
                i as f32 * instance.spacing,
                ground_height + instance.wheel_height,
                0.0,
            );
            if !omitted(suspension[i]) {
                scene.add_node(suspension[i], wheel_at);
            }
            if let Some(name) = wheels.get(i).copied().filter(|n| !omitted(n)) {
                scene.add_wheel(
                    name,
                    SimWheel {
                        position: wheel_at,
                        ..SimWheel::default()
                    },
                );
            }
            if let Some(name) = feet.get(i).copied().filter(|n| !omitted(n)) {
                scene.add_foot(name, wheel_at);
            }
        }
        debug!(
            gear = %instance.name,
            "scene built: {} nodes, {} wheels, {} feet",
            scene.nodes.len(),
            scene.wheels.len(),
            scene.feet.len()
        );
        scene
    }

    pub fn node_position(&self, name: &str) -> Option<Vec3> {
        self.nodes.get(name).map(|n| *n.borrow())
    }

    pub fn wheel(&self, name: &str) -> Option<SimWheel> {
        self.wheels.get(name).map(|w| w.borrow().clone())
    }

    /// Union of the components enabled anywhere in the scene.
    pub fn enabled_components(&self) -> LegComponents {
        let mut flags = LegComponents::empty();
        if self.wheels.values().any(|w| w.borrow().enabled) {
            flags |= LegComponents::WHEEL_PHYSICS;
        }
        if self.feet.values().any(|f| *f.borrow()) {
            flags |= LegComponents::FOOT_COLLIDER;
        }
        flags
    }
}

impl SceneLookup for SimScene {
    fn find_node(&self, name: &str) -> Option<Box<dyn SceneNode>> {
        let node = self.nodes.get(name)?;
        Some(Box::new(NodeHandle(node.clone())))
    }

    fn find_wheel(&self, name: &str) -> Option<Box<dyn WheelPhysics>> {
        let wheel = self.wheels.get(name)?;
        Some(Box::new(WheelHandle(wheel.clone())))
    }

    fn find_foot(&self, name: &str) -> Option<Box<dyn FootCollider>> {
        let foot = self.feet.get(name)?;
        Some(Box::new(FootHandle(foot.clone())))
    }
}

// ─── Ground ─────────────────────────────────────────────────────────

/// Infinite horizontal plane at `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    pub height: f32,
}

impl Raycaster for FlatGround {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        if direction.y >= 0.0 {
            return None;
        }
        let distance = (origin.y - self.height) / -direction.y;
        (distance >= 0.0 && distance <= max_distance).then_some(distance)
    }
}
