use crate::{ConfigError, Vec3d, WindConfig};
use super::util::horizontal_heading;

// (angular frequency rad/s, relative weight) per axis. Distinct, non-harmonic
// frequencies so the pattern does not visibly repeat.
const GUST_X: [(f64, f64); 3] = [(0.7, 1.0), (1.9, 0.5), (4.3, 0.25)];
const GUST_Y: [(f64, f64); 3] = [(0.9, 1.0), (2.3, 0.5), (5.1, 0.25)];
const GUST_Z: [(f64, f64); 3] = [(0.5, 1.0), (1.3, 0.5), (3.7, 0.25)];

const HORIZONTAL_INTENSITY: f64 = 1.0;
const VERTICAL_INTENSITY: f64 = 0.3;

/// Steady horizontal flow plus deterministic multi-sine turbulence.
#[derive(Debug, Clone)]
pub struct WindModel {
    config: WindConfig,
    time: f64,
}

impl WindModel {
    pub fn new(config: WindConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, time: 0.0 })
    }

    pub fn config(&self) -> &WindConfig {
        &self.config
    }

    /// Replace all wind settings; elapsed time is kept.
    pub fn configure(&mut self, config: WindConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), ConfigError> {
        let config = WindConfig {
            speed,
            ..self.config.clone()
        };
        self.configure(config)
    }

    pub fn set_direction_deg(&mut self, direction_deg: f64) -> Result<(), ConfigError> {
        let config = WindConfig {
            direction_deg,
            ..self.config.clone()
        };
        self.configure(config)
    }

    /// Slider-style setter: NaN is ignored, everything else clamps to [0, 1].
    pub fn set_turbulence(&mut self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        self.config.turbulence = fraction.clamp(0.0, 1.0);
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    pub fn mean_vector(&self) -> Vec3d {
        horizontal_heading(self.config.direction_deg) * self.config.speed
    }

    /// Wind at an absolute simulated time. Pure; does not advance the clock.
    pub fn sample(&self, time: f64) -> Vec3d {
        let mean = self.mean_vector();
        let amp = self.config.turbulence * self.config.turbulence_scale * self.config.speed;
        if amp <= 0.0 {
            return mean;
        }
        let gust = Vec3d::new(
            multi_sine(&GUST_X, time) * HORIZONTAL_INTENSITY,
            multi_sine(&GUST_Y, time) * VERTICAL_INTENSITY,
            multi_sine(&GUST_Z, time) * HORIZONTAL_INTENSITY,
        );
        mean + gust * amp
    }

    /// Advance the clock by `dt` and return the wind at the new time.
    pub fn vector_at(&mut self, dt: f64) -> Vec3d {
        if dt.is_finite() && dt > 0.0 {
            self.time += dt;
        }
        self.sample(self.time)
    }
}

// Normalized so the peak magnitude never exceeds 1.
fn multi_sine(terms: &[(f64, f64)], t: f64) -> f64 {
    let total: f64 = terms.iter().map(|(_, w)| w).sum();
    terms.iter().map(|(f, w)| w * (f * t).sin()).sum::<f64>() / total
}
