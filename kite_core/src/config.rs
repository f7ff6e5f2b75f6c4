use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration. Raised at the configuration boundary only; the
/// step loop never sees an invalid value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be positive")]
    NonPositive { field: &'static str },
    #[error("`{field}` must be finite")]
    NonFinite { field: &'static str },
    #[error("`{field}` = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("kite geometry has no usable panels")]
    EmptyGeometry,
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field });
    }
    Ok(())
}

pub(crate) fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    Ok(())
}

pub(crate) fn in_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Physical constants and safety bounds used by the integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravitational acceleration (m/s², applied along world −Y).
    pub gravity: f64,
    /// Air density (kg/m³).
    pub air_density: f64,
    /// Per-step multiplier applied to linear velocity.
    pub linear_damping: f64,
    /// Per-step multiplier applied to angular velocity.
    pub angular_damping: f64,
    /// Angular drag coefficient: drag torque = −angular_drag · ω (N·m·s).
    pub angular_drag: f64,
    pub max_velocity: f64,
    pub max_angular_velocity: f64,
    /// Net forces above this magnitude are discarded for the step.
    pub max_force: f64,
    /// Net torques above this magnitude are discarded for the step.
    pub max_torque: f64,
    /// Blend factor toward the new force/torque each step (1.0 = no smoothing).
    pub force_smoothing: f64,
    pub epsilon: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            air_density: 1.225,
            linear_damping: 0.99,
            angular_damping: 0.95,
            angular_drag: 0.2,
            max_velocity: 30.0,
            max_angular_velocity: 6.0,
            max_force: 2000.0,
            max_torque: 500.0,
            force_smoothing: 0.8,
            epsilon: 1e-6,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("gravity", self.gravity)?;
        in_range("air_density", self.air_density, 0.0, f64::MAX)?;
        in_range("linear_damping", self.linear_damping, 0.0, 1.0)?;
        in_range("angular_damping", self.angular_damping, 0.0, 1.0)?;
        in_range("angular_drag", self.angular_drag, 0.0, f64::MAX)?;
        positive("max_velocity", self.max_velocity)?;
        positive("max_angular_velocity", self.max_angular_velocity)?;
        positive("max_force", self.max_force)?;
        positive("max_torque", self.max_torque)?;
        positive("force_smoothing", self.force_smoothing)?;
        in_range("force_smoothing", self.force_smoothing, 0.0, 1.0)?;
        positive("epsilon", self.epsilon)?;
        Ok(())
    }
}

/// Mean flow and turbulence settings for the wind model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Mean wind speed (m/s).
    pub speed: f64,
    /// Heading the wind blows toward, in the horizontal plane.
    /// 0° = toward +Z, 90° = toward +X.
    pub direction_deg: f64,
    /// Turbulence fraction in [0, 1].
    pub turbulence: f64,
    /// Fluctuation amplitude per unit turbulence, relative to mean speed.
    pub turbulence_scale: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            direction_deg: 0.0,
            turbulence: 0.1,
            turbulence_scale: 0.3,
        }
    }
}

impl WindConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        in_range("wind.speed", self.speed, 0.0, f64::MAX)?;
        finite("wind.direction_deg", self.direction_deg)?;
        in_range("wind.turbulence", self.turbulence, 0.0, 1.0)?;
        in_range("wind.turbulence_scale", self.turbulence_scale, 0.0, f64::MAX)?;
        Ok(())
    }
}

/// Two-line tether parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConstraintConfig {
    /// Line length with zero steer (m).
    pub base_length: f64,
    /// Spring stiffness of a taut line (N/m).
    pub stiffness: f64,
    /// Upper bound on tension per line (N).
    pub max_tension: f64,
    /// Fractional shortening/lengthening per unit steer. Keep
    /// `2 · steer_shorten · base_length` within the handle spacing or the
    /// long line never comes taut.
    pub steer_shorten: f64,
    /// Slack allowed past max length before the position is projected back (m).
    pub tolerance: f64,
    /// Gain of the righting torque from the combined line pull.
    pub stability_factor: f64,
}

impl Default for LineConstraintConfig {
    fn default() -> Self {
        Self {
            base_length: 15.0,
            stiffness: 400.0,
            max_tension: 120.0,
            steer_shorten: 0.006,
            tolerance: 0.005,
            stability_factor: 0.6,
        }
    }
}

impl LineConstraintConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("lines.base_length", self.base_length)?;
        in_range("lines.stiffness", self.stiffness, 0.0, f64::MAX)?;
        in_range("lines.max_tension", self.max_tension, 0.0, f64::MAX)?;
        // Keeps the shortened line strictly positive at full steer.
        in_range("lines.steer_shorten", self.steer_shorten, 0.0, 0.95)?;
        in_range("lines.tolerance", self.tolerance, 0.0, f64::MAX)?;
        in_range("lines.stability_factor", self.stability_factor, 0.0, f64::MAX)?;
        Ok(())
    }
}

/// Optional stall degradation with hysteresis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StallConfig {
    pub enabled: bool,
    /// Angle of attack (deg) at which the kite enters stall.
    pub stall_angle_deg: f64,
    /// Angle of attack (deg) below which a stalled kite recovers.
    pub recovery_angle_deg: f64,
    /// Stall factor floor reached at 90° angle of attack.
    pub min_factor: f64,
}

impl Default for StallConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stall_angle_deg: 70.0,
            recovery_angle_deg: 55.0,
            min_factor: 0.4,
        }
    }
}

impl StallConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        in_range("aero.stall.stall_angle_deg", self.stall_angle_deg, 0.0, 90.0)?;
        in_range(
            "aero.stall.recovery_angle_deg",
            self.recovery_angle_deg,
            0.0,
            self.stall_angle_deg,
        )?;
        in_range("aero.stall.min_factor", self.min_factor, 0.0, 1.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AeroConfig {
    /// Scale applied to every panel force (and therefore torque).
    pub lift_scale: f64,
    pub stall: StallConfig,
}

impl Default for AeroConfig {
    fn default() -> Self {
        Self {
            lift_scale: 1.0,
            stall: StallConfig::default(),
        }
    }
}

impl AeroConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        in_range("aero.lift_scale", self.lift_scale, 0.0, f64::MAX)?;
        self.stall.validate()
    }
}

/// Full engine configuration, owned by the host and handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub wind: WindConfig,
    pub lines: LineConstraintConfig,
    pub aero: AeroConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        self.wind.validate()?;
        self.lines.validate()?;
        self.aero.validate()
    }
}
