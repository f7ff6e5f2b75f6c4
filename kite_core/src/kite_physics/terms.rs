use tracing::warn;

use crate::Vec3d;
use super::util::{LOG_TARGET, WORLD_UP};

// ----- Forces -----

pub(super) fn gravity_force(mass: f64, gravity: f64) -> Vec3d {
    -WORLD_UP * (mass * gravity)
}

pub(super) fn apparent_wind(wind: Vec3d, velocity: Vec3d) -> Vec3d {
    wind - velocity
}

// ----- Torques -----

pub(super) fn angular_drag_torque(drag: f64, omega_body: Vec3d) -> Vec3d {
    -omega_body * drag
}

// ----- Safety -----

/// Drop a net force/torque that is non-finite or exceeds `max_magnitude`.
/// The step continues with the zero vector in its place.
pub(super) fn validated(label: &'static str, v: Vec3d, max_magnitude: f64) -> Vec3d {
    let magnitude = v.length();
    if !v.is_finite() || !magnitude.is_finite() {
        warn!(target: LOG_TARGET, term = label, value = ?v, "Non-finite term replaced with zero");
        return Vec3d::ZERO;
    }
    if magnitude > max_magnitude {
        warn!(target: LOG_TARGET, term = label, magnitude, max = max_magnitude, "Out-of-range term replaced with zero");
        return Vec3d::ZERO;
    }
    v
}

/// Exponential moving average step: blend `alpha` of the way toward `new`.
#[inline]
pub(super) fn low_pass(prev: Vec3d, new: Vec3d, alpha: f64) -> Vec3d {
    prev + (new - prev) * alpha
}
