use crate::Vec3d;

// Diagnostic side-channel target for recovered anomalies.
pub(super) const LOG_TARGET: &str = "kite_physics";

// Below this an incidence cosine or direction length counts as zero.
pub(super) const GEOMETRY_EPS: f64 = 1e-9;

pub(super) const WORLD_UP: Vec3d = Vec3d::Y;

/// Horizontal unit heading for a compass-style angle: 0° = +Z, 90° = +X.
#[inline]
pub(super) fn horizontal_heading(direction_deg: f64) -> Vec3d {
    let (s, c) = direction_deg.to_radians().sin_cos();
    Vec3d::new(s, 0.0, c)
}

/// Scale `v` down to at most `max` length; direction is preserved.
#[inline]
pub(super) fn clamp_magnitude(v: Vec3d, max: f64) -> Vec3d {
    let len2 = v.length_squared();
    if len2 > max * max && len2 > 0.0 {
        v * (max / len2.sqrt())
    } else {
        v
    }
}
