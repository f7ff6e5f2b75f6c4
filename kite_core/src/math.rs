// Shared f64 vector/quaternion types. These are glam's double-precision types
// re-exported through bevy_math, so hosts using Bevy can consume them directly.
pub type Vec3d = bevy_math::DVec3;
pub type Quatd = bevy_math::DQuat;

/// Returns `v` unchanged when every component is finite, otherwise zero.
#[inline]
pub fn finite_or_zero(v: Vec3d) -> Vec3d {
    if v.is_finite() {
        v
    } else {
        Vec3d::ZERO
    }
}

/// Unit vector along `v`, or `None` when `|v| <= eps` (or non-finite).
#[inline]
pub fn normalize_or_none(v: Vec3d, eps: f64) -> Option<Vec3d> {
    let len = v.length();
    if !len.is_finite() || len <= eps {
        return None;
    }
    Some(v / len)
}

/// Renormalize a quaternion; a zero or non-finite one collapses to identity.
#[inline]
pub(crate) fn renormalize(q: Quatd) -> Quatd {
    let n2 = q.length_squared();
    if !n2.is_finite() || n2 <= 0.0 {
        return Quatd::IDENTITY;
    }
    q * n2.sqrt().recip()
}

/// Advance a body→world orientation by a body-frame angular rate over `dt`.
///
/// The increment is the axis-angle rotation `omega_body * dt`, post-multiplied
/// (body-frame delta) and renormalized so the result stays a unit quaternion.
pub fn integrate_orientation(q: Quatd, omega_body: Vec3d, dt: f64) -> Quatd {
    let rot = omega_body * dt;
    if !rot.is_finite() || rot.length_squared() < 1e-24 {
        return renormalize(q);
    }
    let dq = Quatd::from_scaled_axis(rot);
    renormalize(q * dq)
}

#[inline]
pub(crate) fn triangle_cross(a: Vec3d, b: Vec3d, c: Vec3d) -> Vec3d {
    (b - a).cross(c - a)
}

#[inline]
pub(crate) fn triangle_area(a: Vec3d, b: Vec3d, c: Vec3d) -> f64 {
    0.5 * triangle_cross(a, b, c).length()
}

#[inline]
pub(crate) fn triangle_centroid(a: Vec3d, b: Vec3d, c: Vec3d) -> Vec3d {
    (a + b + c) / 3.0
}
