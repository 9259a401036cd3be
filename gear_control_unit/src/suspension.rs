//! Raycast suspension compression.
//!
//! Positions the visual suspension node of a deployed leg from a ray cast
//! along the wheel's down axis. The host wheel physics only reports contact
//! force, so the visual travel is computed here.

use glam::Vec3;

use crate::leg::LegUnit;
use crate::scene::Raycaster;

/// Result of one suspension update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SuspensionContact {
    /// Ray hit the ground.
    Grounded {
        /// Clamped hit distance [m].
        distance: f32,
        /// Compression applied to the suspension node [m].
        compression: f32,
    },
    /// No ground within range; node fully extended.
    Airborne,
}

impl SuspensionContact {
    pub fn compression(&self) -> f32 {
        match self {
            Self::Grounded { compression, .. } => *compression,
            Self::Airborne => 0.0,
        }
    }
}

/// Compression for a ray hit at `hit_distance`.
///
/// `(travel + radius − d) + offset`, all scaled, with `d` clamped to the ray
/// range and the result clamped at zero.
pub fn compression_for_hit(
    hit_distance: f32,
    travel: f32,
    radius: f32,
    offset: f32,
    scale: f32,
) -> f32 {
    let reach = travel * scale + radius * scale;
    let distance = hit_distance.clamp(0.0, reach.max(0.0));
    ((reach - distance) + offset * scale).max(0.0)
}

/// Run one suspension update for a leg.
pub fn simulate_leg(leg: &mut LegUnit, scale: f32, raycaster: &dyn Raycaster) -> SuspensionContact {
    let origin = leg.wheel_position();
    let up = leg.wheel_up().normalize_or_zero();
    if up == Vec3::ZERO {
        leg.set_suspension_position(origin);
        return SuspensionContact::Airborne;
    }

    let max_distance = (leg.suspension_travel + leg.wheel_radius) * scale;
    match raycaster.raycast(origin, -up, max_distance) {
        Some(hit) if hit <= max_distance => {
            let compression = compression_for_hit(
                hit,
                leg.suspension_travel,
                leg.wheel_radius,
                leg.suspension_offset,
                scale,
            );
            leg.set_suspension_position(origin + up * compression);
            SuspensionContact::Grounded {
                distance: hit.clamp(0.0, max_distance.max(0.0)),
                compression,
            }
        }
        _ => {
            leg.set_suspension_position(origin);
            SuspensionContact::Airborne
        }
    }
}
