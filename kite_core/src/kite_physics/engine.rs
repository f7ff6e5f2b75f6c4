use tracing::{debug, warn};

use super::aero::{AerodynamicsCalculator, AeroForces};
use super::lines::{LineConstraintSystem, LineTensions};
use super::terms::{angular_drag_torque, apparent_wind, gravity_force, low_pass, validated};
use super::types::{ControlInput, Handles, KiteState, StepMetrics};
use super::util::{clamp_magnitude, GEOMETRY_EPS, LOG_TARGET};
use super::wind::WindModel;
use crate::math::{finite_or_zero, integrate_orientation, normalize_or_none};
use crate::{ConfigError, EngineConfig, KiteSpec, PhysicsConfig, Side, Vec3d};

// Floors for mass/inertia read from an externally editable `KiteState`.
const MIN_MASS: f64 = 1e-3;
const MIN_INERTIA: f64 = 1e-6;

/// Single-kite rigid-body stepper.
///
/// Owns the wind model, the aerodynamic and line models, and the private
/// motion state (velocities plus the smoothed force/torque). Not reentrant:
/// one engine drives one `KiteState` from one thread.
#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    physics: PhysicsConfig,
    wind: WindModel,
    aero: AerodynamicsCalculator,
    lines: LineConstraintSystem,
    /// World frame (m/s).
    velocity: Vec3d,
    /// Body frame (rad/s).
    angular_velocity: Vec3d,
    smoothed_force: Vec3d,
    smoothed_torque: Vec3d,
}

impl PhysicsEngine {
    pub fn new(spec: &KiteSpec, config: EngineConfig) -> Result<Self, ConfigError> {
        spec.validate()?;
        config.validate()?;
        let EngineConfig {
            physics,
            wind,
            lines,
            aero,
        } = config;
        let geometry = &spec.geometry;
        Ok(Self {
            physics,
            wind: WindModel::new(wind)?,
            aero: AerodynamicsCalculator::new(geometry.panels.clone(), aero)?,
            lines: LineConstraintSystem::new(
                lines,
                geometry.attachment(Side::Left),
                geometry.attachment(Side::Right),
            )?,
            velocity: Vec3d::ZERO,
            angular_velocity: Vec3d::ZERO,
            smoothed_force: Vec3d::ZERO,
            smoothed_torque: Vec3d::ZERO,
        })
    }

    /// Snapshot of the configuration currently in effect.
    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            physics: self.physics.clone(),
            wind: self.wind.config().clone(),
            lines: self.lines.config().clone(),
            aero: self.aero.config().clone(),
        }
    }

    /// Swap every tunable at once. Nothing changes unless all of it validates.
    pub fn update_config(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let EngineConfig {
            physics,
            wind,
            lines,
            aero,
        } = config;
        self.physics = physics;
        self.wind.configure(wind)?;
        self.lines.update_config(lines)?;
        self.aero.update_config(aero)?;
        debug!(target: LOG_TARGET, "Engine configuration updated");
        Ok(())
    }

    /// Zero the motion state and rewind wind time, steer bias and stall state.
    pub fn reset(&mut self) {
        self.velocity = Vec3d::ZERO;
        self.angular_velocity = Vec3d::ZERO;
        self.smoothed_force = Vec3d::ZERO;
        self.smoothed_torque = Vec3d::ZERO;
        self.wind.reset();
        self.lines.reset();
        self.aero.reset();
        debug!(target: LOG_TARGET, "Engine reset");
    }

    pub fn velocity(&self) -> Vec3d {
        self.velocity
    }

    /// Host-side contact: drop the part of the velocity driving into a
    /// surface whose outward normal is `normal`. Motion along or away from
    /// the surface is kept. A zero or non-finite normal is ignored.
    pub fn resolve_contact(&mut self, normal: Vec3d) {
        let Some(n) = normalize_or_none(normal, GEOMETRY_EPS) else {
            return;
        };
        let into = self.velocity.dot(n);
        if into < 0.0 {
            self.velocity -= n * into;
            debug!(target: LOG_TARGET, removed = -into, "Contact velocity removed");
        }
    }

    pub fn angular_velocity(&self) -> Vec3d {
        self.angular_velocity
    }

    pub fn wind(&self) -> &WindModel {
        &self.wind
    }

    pub fn wind_mut(&mut self) -> &mut WindModel {
        &mut self.wind
    }

    pub fn lines(&self) -> &LineConstraintSystem {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut LineConstraintSystem {
        &mut self.lines
    }

    pub fn aero(&self) -> &AerodynamicsCalculator {
        &self.aero
    }

    /// Advance the kite by `dt` seconds.
    ///
    /// Writes the new position/orientation into `state` and returns metrics.
    /// Never fails: numeric anomalies zero the offending term and are logged.
    /// A non-positive or non-finite `dt` leaves everything untouched.
    pub fn step(
        &mut self,
        dt: f64,
        state: &mut KiteState,
        control: ControlInput,
        handles: &Handles,
    ) -> StepMetrics {
        if !(dt.is_finite() && dt > 0.0) {
            return StepMetrics::calm(Vec3d::ZERO, Vec3d::ZERO, self.lines.effective_lengths());
        }
        let p = &self.physics;
        let mass = state.mass.max(MIN_MASS);
        let inertia = state.inertia.max(MIN_INERTIA);

        // 1. Relative airflow
        let wind = self.wind.vector_at(dt);
        let apparent = apparent_wind(wind, self.velocity);
        let airspeed = apparent.length();
        // NaN airspeed counts as calm
        let calm = !(airspeed >= p.epsilon);

        // 2-4. Aerodynamics, gravity, lines
        self.lines.set_steer(control.steer);
        let (aero, tensions) = if calm {
            (AeroForces::zero(), LineTensions::default())
        } else {
            let aero = self
                .aero
                .calculate_forces(apparent, state.orientation, p.air_density);
            // Tensions are taken where the kite would be at the end of this step
            // without new forces, so a cord about to stretch pulls this step.
            let look_ahead = KiteState {
                position: state.position + self.velocity * dt,
                ..state.clone()
            };
            let tensions = self.lines.calculate_tensions(&look_ahead, handles);
            (aero, tensions)
        };
        let gravity = gravity_force(mass, p.gravity);

        // 5-7. Sum, validate, smooth
        let force = validated(
            "force",
            aero.total_force + gravity + tensions.total_force(),
            p.max_force,
        );
        let torque = validated("torque", aero.torque + tensions.torque, p.max_torque);
        self.smoothed_force = low_pass(self.smoothed_force, force, p.force_smoothing);
        self.smoothed_torque = low_pass(self.smoothed_torque, torque, p.force_smoothing);

        // 8. Linear motion
        let v = (self.velocity + self.smoothed_force / mass * dt) * p.linear_damping;
        self.velocity = clamp_magnitude(finite_or_zero(v), p.max_velocity);
        let predicted = state.position + self.velocity * dt;

        // 9. Cord constraint
        let corrected = self.lines.enforce(predicted, handles.left, handles.right);

        // 10. Angular motion (body frame, isotropic inertia)
        let torque_body = state.orientation.inverse() * self.smoothed_torque;
        let drag = angular_drag_torque(p.angular_drag, self.angular_velocity);
        let omega = self.angular_velocity + (torque_body + drag) / inertia * dt;
        self.angular_velocity =
            clamp_magnitude(finite_or_zero(omega), p.max_angular_velocity) * p.angular_damping;

        // 11-12. Orientation and commit
        let orientation = integrate_orientation(state.orientation, self.angular_velocity, dt);
        if corrected.is_finite() {
            state.position = corrected;
        } else {
            warn!(target: LOG_TARGET, ?corrected, "Non-finite corrected position discarded");
        }
        state.orientation = orientation;

        // 13. Metrics
        if calm {
            return StepMetrics::calm(wind, apparent, self.lines.effective_lengths());
        }
        let (left_line_length, right_line_length) = self.lines.effective_lengths();
        StepMetrics {
            total_force: force,
            force_magnitude: force.length(),
            torque,
            aero_force: aero.total_force,
            line_torque: tensions.torque,
            left_tension: tensions.left_tension,
            right_tension: tensions.right_tension,
            max_tension: tensions.max_tension(),
            angle_of_attack_deg: aero.angle_of_attack_deg,
            stall_factor: aero.stall_factor,
            airspeed,
            apparent_wind: apparent,
            wind,
            left_line_length,
            right_line_length,
            calm: false,
            panels: aero.panels,
        }
    }
}
