//! Capability traits for the host scene and physics engine.
//!
//! The controller never integrates wheel physics itself; it only needs the
//! minimal contract below. Hosts hand out boxed handles from named lookups.

use glam::Vec3;

/// A transform whose position the controller reads and writes.
pub trait SceneNode {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
}

/// Flat contact proxy enabled while a leg is in transit.
pub trait FootCollider {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
}

/// Spring parameters of a wheel-physics component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuspensionSpring {
    pub spring: f32,
    pub damper: f32,
    /// Rest target as a fraction of travel (0..1).
    pub target_position: f32,
}

/// Host-owned wheel physics (spring/damper integrator).
pub trait WheelPhysics {
    /// World position of the wheel center.
    fn position(&self) -> Vec3;
    /// World-space up axis of the wheel component.
    fn up(&self) -> Vec3;

    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);

    fn radius(&self) -> f32;
    fn set_radius(&mut self, radius: f32);

    fn suspension_travel(&self) -> f32;
    fn set_suspension_travel(&mut self, travel: f32);

    fn spring(&self) -> SuspensionSpring;
    fn set_spring(&mut self, spring: SuspensionSpring);
}

/// Named lookups into the live scene, used once at setup.
pub trait SceneLookup {
    /// Any node with the given name.
    fn find_node(&self, name: &str) -> Option<Box<dyn SceneNode>>;
    /// Wheel-physics component attached to the named node.
    fn find_wheel(&self, name: &str) -> Option<Box<dyn WheelPhysics>>;
    /// Foot collider attached to the named node.
    fn find_foot(&self, name: &str) -> Option<Box<dyn FootCollider>>;
}

/// Physics-world ray query.
pub trait Raycaster {
    /// Distance to the first surface hit along `direction`, if within
    /// `max_distance`. `direction` is unit length.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32>;
}
