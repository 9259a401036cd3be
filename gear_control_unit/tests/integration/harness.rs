//! Host doubles shared by the integration tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use gear_common::config::GearConfig;
use gear_common::state::{AnimState, HostMode, LegComponents};
use gear_control_unit::anim::{AnimationPort, CompletionSender, completion_channel};
use gear_control_unit::controller::GearController;
use gear_control_unit::scene::{
    FootCollider, Raycaster, SceneLookup, SceneNode, SuspensionSpring, WheelPhysics,
};
use glam::Vec3;

pub const DT: f32 = 0.02;

/// Ticks the deploy/retract animation takes to play through.
pub const ANIM_TICKS: u32 = 10;

// ── Scene ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Wheel {
    pub position: Vec3,
    pub enabled: bool,
    pub radius: f32,
    pub travel: f32,
    pub spring: SuspensionSpring,
}

struct Node(Rc<RefCell<Vec3>>);
struct WheelRef(Rc<RefCell<Wheel>>);
struct Foot(Rc<RefCell<bool>>);

impl SceneNode for Node {
    fn position(&self) -> Vec3 {
        *self.0.borrow()
    }
    fn set_position(&mut self, position: Vec3) {
        *self.0.borrow_mut() = position;
    }
}

impl WheelPhysics for WheelRef {
    fn position(&self) -> Vec3 {
        self.0.borrow().position
    }
    fn up(&self) -> Vec3 {
        Vec3::Y
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

impl FootCollider for Foot {
    fn is_enabled(&self) -> bool {
        *self.0.borrow()
    }
    fn set_enabled(&mut self, enabled: bool) {
        *self.0.borrow_mut() = enabled;
    }
}

/// Legs named `Leg{i}` / `Wheel{i}` / `Foot{i}`, wheels at y = 1.
#[derive(Default)]
pub struct Scene {
    pub nodes: HashMap<String, Rc<RefCell<Vec3>>>,
    pub wheels: HashMap<String, Rc<RefCell<Wheel>>>,
    pub feet: HashMap<String, Rc<RefCell<bool>>>,
}

impl Scene {
    pub fn with_legs(count: usize) -> Self {
        let mut scene = Self::default();
        for i in 0..count {
            let position = Vec3::new(i as f32, 1.0, 0.0);
            scene.nodes.insert(format!("Leg{i}"), Rc::new(RefCell::new(position)));
            scene.nodes.insert(format!("Wheel{i}"), Rc::new(RefCell::new(position)));
            scene.nodes.insert(format!("Foot{i}"), Rc::new(RefCell::new(position)));
            scene.wheels.insert(
                format!("Wheel{i}"),
                Rc::new(RefCell::new(Wheel {
                    position,
                    enabled: false,
                    radius: 0.5,
                    travel: 0.3,
                    spring: SuspensionSpring {
                        spring: 100.0,
                        damper: 10.0,
                        target_position: 0.5,
                    },
                })),
            );
            scene.feet.insert(format!("Foot{i}"), Rc::new(RefCell::new(false)));
        }
        scene
    }

    /// Host-side component flags of every wheel/foot pair, by leg index.
    pub fn components(&self, count: usize) -> Vec<LegComponents> {
        (0..count)
            .map(|i| {
                let mut flags = LegComponents::empty();
                if self.wheels[&format!("Wheel{i}")].borrow().enabled {
                    flags |= LegComponents::WHEEL_PHYSICS;
                }
                if *self.feet[&format!("Foot{i}")].borrow() {
                    flags |= LegComponents::FOOT_COLLIDER;
                }
                flags
            })
            .collect()
    }
}

impl SceneLookup for Scene {
    fn find_node(&self, name: &str) -> Option<Box<dyn SceneNode>> {
        let node = self.nodes.get(name)?;
        Some(Box::new(Node(node.clone())))
    }
    fn find_wheel(&self, name: &str) -> Option<Box<dyn WheelPhysics>> {
        let wheel = self.wheels.get(name)?;
        Some(Box::new(WheelRef(wheel.clone())))
    }
    fn find_foot(&self, name: &str) -> Option<Box<dyn FootCollider>> {
        let foot = self.feet.get(name)?;
        Some(Box::new(Foot(foot.clone())))
    }
}

// ── Ground ──────────────────────────────────────────────────────────

/// Horizontal ground plane; `None` for open sky.
pub struct Ground(pub Option<f32>);

impl Raycaster for Ground {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let height = self.0?;
        if direction.y >= 0.0 {
            return None;
        }
        let distance = (origin.y - height) / -direction.y;
        (distance >= 0.0 && distance <= max_distance).then_some(distance)
    }
}

// ── Animation ───────────────────────────────────────────────────────

/// Animation player that plays through in `ANIM_TICKS` ticks.
pub struct TickAnimation {
    current: AnimState,
    remaining: u32,
    sender: CompletionSender,
    pub requests: Vec<AnimState>,
}

impl TickAnimation {
    pub fn advance(&mut self) {
        if self.current.is_stopped() {
            return;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.current = self.current.destination();
            self.sender.notify(self.current);
        }
    }
}

impl AnimationPort for TickAnimation {
    fn request_state(&mut self, target: AnimState) {
        self.requests.push(target);
        self.current = target;
        self.remaining = if target.is_stopped() { 0 } else { ANIM_TICKS };
    }
    fn current_state(&self) -> AnimState {
        self.current
    }
}

// ── Rig ─────────────────────────────────────────────────────────────

pub type Gear = GearController<TickAnimation>;

pub fn config(count: usize) -> GearConfig {
    let names = |prefix: &str| {
        (0..count)
            .map(|i| format!("{prefix}{i}"))
            .collect::<Vec<_>>()
            .join(",")
    };
    let mut config = GearConfig::new("LandingLeg", &names("Leg"), &names("Wheel"));
    config.foot_nodes = names("Foot");
    config
}

/// Controller bound to a fresh scene, not yet started.
pub fn rig_with(config: GearConfig, scene: &Scene, mode: HostMode) -> Gear {
    let (sender, receiver) = completion_channel();
    let animation = TickAnimation {
        current: AnimState::StoppedStart,
        remaining: 0,
        sender,
        requests: Vec::new(),
    };
    let mut gear = GearController::new(Arc::new(config), animation, mode);
    gear.subscribe(receiver);
    gear.setup(scene);
    gear
}

/// Started flight-mode controller with `count` legs.
pub fn started(count: usize) -> (Gear, Scene) {
    let scene = Scene::with_legs(count);
    let mut gear = rig_with(config(count), &scene, HostMode::Flight);
    gear.start();
    (gear, scene)
}

/// One host frame: animation first, then the physics tick.
pub fn tick(gear: &mut Gear, ground: &Ground) {
    gear.animation_mut().advance();
    gear.fixed_update(DT, ground);
}

pub fn run(gear: &mut Gear, ground: &Ground, ticks: u32) {
    for _ in 0..ticks {
        tick(gear, ground);
    }
}
