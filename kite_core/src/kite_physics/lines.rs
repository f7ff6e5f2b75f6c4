use crate::{ConfigError, LineConstraintConfig, Side, Vec3d};
use crate::config::positive;
use crate::math::normalize_or_none;
use super::types::{Handles, KiteState};
use super::util::GEOMETRY_EPS;

/// Line forces and the torque they apply about the kite reference point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineTensions {
    pub left_force: Vec3d,
    pub right_force: Vec3d,
    pub left_tension: f64,
    pub right_tension: f64,
    pub torque: Vec3d,
}

impl LineTensions {
    pub fn total_force(&self) -> Vec3d {
        self.left_force + self.right_force
    }

    pub fn max_tension(&self) -> f64 {
        self.left_tension.max(self.right_tension)
    }
}

/// Two tethers from the pilot's handles to the kite.
///
/// Line length is measured from a handle to the kite reference point; the
/// pull of a taut line acts at that side's bridle attachment. Steering biases
/// the two lengths in opposite directions.
#[derive(Debug, Clone)]
pub struct LineConstraintSystem {
    config: LineConstraintConfig,
    left_attachment: Vec3d,
    right_attachment: Vec3d,
    steer: f64,
}

impl LineConstraintSystem {
    pub fn new(
        config: LineConstraintConfig,
        left_attachment: Vec3d,
        right_attachment: Vec3d,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            left_attachment,
            right_attachment,
            steer: 0.0,
        })
    }

    pub fn config(&self) -> &LineConstraintConfig {
        &self.config
    }

    pub fn update_config(&mut self, config: LineConstraintConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_base_length(&mut self, length: f64) -> Result<(), ConfigError> {
        positive("lines.base_length", length)?;
        self.config.base_length = length;
        Ok(())
    }

    /// Steer is clamped to [-1, 1]; NaN reads as 0.
    pub fn set_steer(&mut self, steer: f64) {
        self.steer = if steer.is_nan() { 0.0 } else { steer.clamp(-1.0, 1.0) };
    }

    pub fn steer(&self) -> f64 {
        self.steer
    }

    pub fn reset(&mut self) {
        self.steer = 0.0;
    }

    /// Current (left, right) maximum lengths after the steer bias.
    pub fn effective_lengths(&self) -> (f64, f64) {
        let base = self.config.base_length;
        let k = self.config.steer_shorten * self.steer;
        (base * (1.0 - k), base * (1.0 + k))
    }

    pub fn effective_length(&self, side: Side) -> f64 {
        let (left, right) = self.effective_lengths();
        match side {
            Side::Left => left,
            Side::Right => right,
        }
    }

    fn attachment(&self, side: Side) -> Vec3d {
        match side {
            Side::Left => self.left_attachment,
            Side::Right => self.right_attachment,
        }
    }

    /// Cord-style correction: pull `predicted` back inside each line's sphere.
    ///
    /// Left is applied, then right. While the handles are closer together than
    /// the left length the right projection, which moves toward the right
    /// handle, stays inside the left sphere, so both hold within tolerance.
    pub fn enforce(&self, predicted: Vec3d, left_handle: Vec3d, right_handle: Vec3d) -> Vec3d {
        let (left_len, right_len) = self.effective_lengths();
        let tol = self.config.tolerance;
        let p = project_into_sphere(predicted, left_handle, left_len, tol);
        project_into_sphere(p, right_handle, right_len, tol)
    }

    /// One-sided spring tensions for both lines at `state`'s pose.
    pub fn calculate_tensions(&self, state: &KiteState, handles: &Handles) -> LineTensions {
        let mut out = LineTensions::default();
        let mut offsets = [Vec3d::ZERO; 2];

        for (i, side) in [Side::Left, Side::Right].into_iter().enumerate() {
            let offset = state.orientation * self.attachment(side);
            offsets[i] = offset;
            let Some((force, tension)) = self.line_force(state.position, offset, handles.get(side), side)
            else {
                continue;
            };
            out.torque += offset.cross(force);
            match side {
                Side::Left => {
                    out.left_force = force;
                    out.left_tension = tension;
                }
                Side::Right => {
                    out.right_force = force;
                    out.right_tension = tension;
                }
            }
        }

        // Righting moment: the combined pull swings the bridle toward the pilot.
        let bridle = (offsets[0] + offsets[1]) * 0.5;
        out.torque += bridle.cross(out.total_force()) * self.config.stability_factor;
        out
    }

    fn line_force(
        &self,
        position: Vec3d,
        attachment_offset: Vec3d,
        handle: Vec3d,
        side: Side,
    ) -> Option<(Vec3d, f64)> {
        let distance = (handle - position).length();
        let extension = distance - self.effective_length(side);
        if !extension.is_finite() || extension <= 0.0 {
            return None;
        }
        let dir = normalize_or_none(handle - (position + attachment_offset), GEOMETRY_EPS)?;
        let tension = (self.config.stiffness * extension).min(self.config.max_tension);
        Some((dir * tension, tension))
    }
}

fn project_into_sphere(p: Vec3d, center: Vec3d, radius: f64, tolerance: f64) -> Vec3d {
    let span = p - center;
    let distance = span.length();
    if !distance.is_finite() || distance <= radius + tolerance {
        return p;
    }
    center + span * (radius / distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{kitespecs, Quatd};

    fn lines(base: f64) -> LineConstraintSystem {
        let geometry = kitespecs::delta_kite_spec().geometry;
        LineConstraintSystem::new(
            LineConstraintConfig {
                base_length: base,
                ..LineConstraintConfig::default()
            },
            geometry.attachment(Side::Left),
            geometry.attachment(Side::Right),
        )
        .unwrap()
    }

    fn handles() -> Handles {
        Handles::new(Vec3d::new(-0.3, 1.0, 0.0), Vec3d::new(0.3, 1.0, 0.0))
    }

    fn kite_at(position: Vec3d) -> KiteState {
        KiteState::new(&kitespecs::delta_kite_spec(), position, Quatd::IDENTITY)
    }

    #[test]
    fn zero_steer_gives_base_lengths() {
        let l = lines(15.0);
        assert_eq!(l.effective_lengths(), (15.0, 15.0));
    }

    #[test]
    fn steer_is_monotonic_and_clamped() {
        let mut l = lines(15.0);
        let mut prev = (f64::INFINITY, f64::NEG_INFINITY);
        for i in 0..=20 {
            l.set_steer(i as f64 / 20.0);
            let (left, right) = l.effective_lengths();
            assert!(left < prev.0 && right > prev.1, "steer {} -> {:?}", l.steer(), (left, right));
            prev = (left, right);
        }
        l.set_steer(4.0);
        assert_eq!(l.steer(), 1.0);
        l.set_steer(-1.0);
        let (left, right) = l.effective_lengths();
        assert!(left > 15.0 && right < 15.0);
        l.set_steer(f64::NAN);
        assert_eq!(l.steer(), 0.0);
    }

    #[test]
    fn enforce_holds_both_spheres_across_a_grid() {
        let handle_pairs = [
            (Vec3d::new(-0.3, 1.0, 0.0), Vec3d::new(0.3, 1.0, 0.0)),
            (Vec3d::new(0.0, 1.0, 0.0), Vec3d::new(0.0, 1.0, 0.0)),
            (Vec3d::new(-1.0, 0.5, -0.5), Vec3d::new(0.8, 1.5, 0.4)),
        ];
        let mut l = lines(10.0);
        let tol = l.config().tolerance;
        let mut projected = 0;

        for steer in [-1.0, 0.0, 1.0] {
            l.set_steer(steer);
            let (left_len, right_len) = l.effective_lengths();
            for (hl, hr) in handle_pairs {
                for x in (-3..=3).map(|i| i as f64 * 5.0) {
                    for y in (-1..=5).map(|i| i as f64 * 5.0) {
                        for z in (-3..=5).map(|i| i as f64 * 5.0) {
                            let p = Vec3d::new(x, y, z);
                            let out = l.enforce(p, hl, hr);
                            let ctx = format!("p={p:?} handles=({hl:?}, {hr:?}) steer={steer}");

                            assert!(out.is_finite(), "{ctx}");
                            assert!((out - hl).length() <= left_len + tol + 1e-9, "left: {ctx} -> {out:?}");
                            assert!((out - hr).length() <= right_len + tol + 1e-9, "right: {ctx} -> {out:?}");
                            assert!(l.enforce(out, hl, hr).abs_diff_eq(out, 1e-12), "not idempotent: {ctx}");

                            let inside = (p - hl).length() <= left_len + tol
                                && (p - hr).length() <= right_len + tol;
                            if inside {
                                assert_eq!(out, p, "inside point moved: {ctx}");
                                continue;
                            }
                            projected += 1;
                            if hl == hr && (p - hl).length() > left_len.max(right_len) + tol {
                                let r = (out - hl).length();
                                assert!((r - left_len.min(right_len)).abs() < 1e-9, "{ctx}: r={r}");
                                let along = (out - hl).normalize().dot((p - hl).normalize());
                                assert!((along - 1.0).abs() < 1e-12, "{ctx}: direction changed");
                            }
                        }
                    }
                }
            }
        }
        assert!(projected > 100, "grid should reach past the lines ({projected})");
    }

    #[test]
    fn enforce_is_noop_inside() {
        let l = lines(10.0);
        let h = handles();
        let inside = Vec3d::new(0.5, 4.0, 6.0);
        assert_eq!(l.enforce(inside, h.left, h.right), inside);
        // Within tolerance counts as inside
        let edge = h.left + Vec3d::Z * (10.0 + 0.5 * l.config().tolerance);
        assert_eq!(l.enforce(edge, h.left, h.left), edge);
    }

    #[test]
    fn slack_lines_have_no_tension() {
        let l = lines(15.0);
        let t = l.calculate_tensions(&kite_at(Vec3d::new(0.0, 6.0, 8.0)), &handles());
        assert_eq!(t, LineTensions::default());
    }

    #[test]
    fn taut_line_pulls_toward_handle_and_clamps() {
        let l = lines(10.0);
        let h = handles();
        let kite = kite_at(Vec3d::new(0.0, 8.0, 9.0));
        let t = l.calculate_tensions(&kite, &h);
        assert!(t.left_tension > 0.0 && t.right_tension > 0.0);
        assert!(t.max_tension() <= l.config().max_tension + 1e-12);
        let attach = kite.position + kite.orientation * l.left_attachment;
        let to_handle = (h.left - attach).normalize();
        assert!(t.left_force.normalize().abs_diff_eq(to_handle, 1e-9));
    }

    #[test]
    fn tension_is_spring_below_clamp() {
        let l = lines(10.0);
        let h = handles();
        // Straight above the left handle, 0.05 m past max length
        let kite = kite_at(h.left + Vec3d::Y * 10.05);
        let t = l.calculate_tensions(&kite, &h);
        let expected = l.config().stiffness * 0.05;
        assert!((t.left_tension - expected).abs() < 1e-6, "left={}", t.left_tension);
    }

    #[test]
    fn full_left_steer_loads_left_line_only() {
        let mut l = lines(15.0);
        l.set_steer(1.0);
        let h = handles();
        let kite = kite_at(Vec3d::new(0.0, 1.0 + 15.0 * 0.6, 15.0 * 0.8));
        let t = l.calculate_tensions(&kite, &h);
        assert!(t.left_tension > 0.0, "left={}", t.left_tension);
        assert_eq!(t.right_tension, 0.0);
        // Left bridle pulled toward the pilot yaws the kite toward negative Y torque
        assert!(t.torque.y < 0.0, "torque={:?}", t.torque);
    }

    #[test]
    fn rejects_bad_base_length() {
        let mut l = lines(15.0);
        assert!(l.set_base_length(0.0).is_err());
        assert!(l.set_base_length(f64::NAN).is_err());
        assert_eq!(l.config().base_length, 15.0);
        l.set_base_length(20.0).unwrap();
        assert_eq!(l.effective_lengths(), (20.0, 20.0));
    }
}
