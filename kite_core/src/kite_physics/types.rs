use serde::{Deserialize, Serialize};

use crate::{KiteSpec, Quatd, Side, Vec3d};

/// Externally visible rigid-body state. Position and orientation are written
/// by `PhysicsEngine::step`; velocities live inside the engine.
#[derive(Debug, Clone)]
pub struct KiteState {
    /// World-frame position of the kite reference point.
    pub position: Vec3d,
    /// Orientation as quaternion (body→world).
    /// Body axes: +Z is the downwind face normal, +Y up, −X left.
    pub orientation: Quatd,
    pub mass: f64,
    /// Isotropic moment of inertia (kg·m²).
    pub inertia: f64,
}

impl KiteState {
    pub fn new(spec: &KiteSpec, position: Vec3d, orientation: Quatd) -> Self {
        Self {
            position,
            orientation,
            mass: spec.mass,
            inertia: spec.inertia,
        }
    }
}

/// Pilot input for one step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    /// Steer in [-1, 1]. +1 shortens the left line and lengthens the right.
    pub steer: f64,
}

impl ControlInput {
    /// Build from a raw device value: NaN reads as 0, values are clamped to
    /// [-1, 1], and anything inside `deadzone` is zeroed.
    pub fn from_raw(raw: f64, deadzone: f64) -> Self {
        let steer = if raw.is_nan() { 0.0 } else { raw.clamp(-1.0, 1.0) };
        let steer = if steer.abs() < deadzone.max(0.0) { 0.0 } else { steer };
        Self { steer }
    }
}

/// World-frame pilot hand positions (control bar ends).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Handles {
    pub left: Vec3d,
    pub right: Vec3d,
}

impl Handles {
    pub fn new(left: Vec3d, right: Vec3d) -> Self {
        Self { left, right }
    }

    pub fn get(&self, side: Side) -> Vec3d {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Per-panel aerodynamic diagnostics, all in world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelForce {
    pub side: Side,
    pub force: Vec3d,
    /// Panel normal oriented along the push direction.
    pub normal: Vec3d,
    /// Panel centroid relative to the kite reference point.
    pub centroid: Vec3d,
    pub cos_incidence: f64,
    pub area: f64,
}

/// Output record of one `PhysicsEngine::step`.
#[derive(Debug, Clone, Default)]
pub struct StepMetrics {
    /// Net validated force for the step (zero in calm steps).
    pub total_force: Vec3d,
    pub force_magnitude: f64,
    /// Net validated torque, world frame.
    pub torque: Vec3d,
    pub aero_force: Vec3d,
    pub line_torque: Vec3d,
    pub left_tension: f64,
    pub right_tension: f64,
    pub max_tension: f64,
    pub angle_of_attack_deg: f64,
    pub stall_factor: f64,
    /// |apparent wind| (m/s).
    pub airspeed: f64,
    pub apparent_wind: Vec3d,
    pub wind: Vec3d,
    pub left_line_length: f64,
    pub right_line_length: f64,
    /// True when airspeed was below epsilon and no aero/line force developed.
    pub calm: bool,
    pub panels: Vec<PanelForce>,
}

impl StepMetrics {
    /// The zero record reported when no relative airflow exists.
    pub(super) fn calm(wind: Vec3d, apparent_wind: Vec3d, line_lengths: (f64, f64)) -> Self {
        Self {
            stall_factor: 1.0,
            airspeed: apparent_wind.length(),
            apparent_wind,
            wind,
            left_line_length: line_lengths.0,
            right_line_length: line_lengths.1,
            calm: true,
            ..Self::default()
        }
    }
}
