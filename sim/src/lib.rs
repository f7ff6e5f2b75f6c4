//! Headless host loop for `kite_core`.
//!
//! Loads a TOML run description, steps the engine at a fixed tick and logs
//! telemetry. The ground plane lives here, not in the engine.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use kite_core::{
    kitespecs, ControlInput, EngineConfig, Handles, KiteSpec, KiteState, PhysicsEngine, Quatd,
    Vec3d,
};

#[derive(Parser, Debug, Clone)]
#[command(name = "kite-sim")]
#[command(about = "Headless two-line kite simulation", long_about = None)]
pub struct Args {
    /// Path to the TOML run configuration
    #[arg(long, default_value = "kite_sim.toml")]
    pub config: PathBuf,
    /// Override the run duration (seconds)
    #[arg(long)]
    pub duration: Option<f64>,
    /// Hold a constant steer for the whole run, replacing the schedule
    #[arg(long, allow_hyphen_values = true)]
    pub steer: Option<f64>,
}

impl Args {
    pub fn apply(&self, cfg: &mut SimConfig) {
        if let Some(duration) = self.duration {
            cfg.duration_s = duration;
        }
        if let Some(steer) = self.steer {
            cfg.steer_schedule = vec![SteerSegment {
                start_s: 0.0,
                steer,
            }];
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KiteKind {
    #[default]
    Delta,
    Diamond,
}

impl KiteKind {
    pub fn spec(self) -> KiteSpec {
        match self {
            KiteKind::Delta => kitespecs::delta_kite_spec(),
            KiteKind::Diamond => kitespecs::diamond_kite_spec(),
        }
    }
}

/// Steer held from `start_s` until the next segment begins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteerSegment {
    pub start_s: f64,
    pub steer: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tick_hz: f64,
    pub duration_s: f64,
    /// Telemetry line every N ticks; 0 disables.
    pub log_every: u64,
    /// Upper bound on a single step's dt.
    pub max_frame_dt: f64,
    pub ground_y: f64,
    pub kite: KiteKind,
    pub handles: Handles,
    pub initial_position: Vec3d,
    /// Launch pitch about world X; negative tips the top edge toward the pilot.
    pub initial_pitch_deg: f64,
    pub steer_schedule: Vec<SteerSegment>,
    pub deadzone: f64,
    pub engine: EngineConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            duration_s: 20.0,
            log_every: 60,
            max_frame_dt: 1.0 / 30.0,
            ground_y: 0.0,
            kite: KiteKind::Delta,
            handles: Handles::new(Vec3d::new(-0.3, 1.0, 0.0), Vec3d::new(0.3, 1.0, 0.0)),
            initial_position: Vec3d::new(0.0, 8.0, 10.0),
            initial_pitch_deg: -30.0,
            steer_schedule: Vec::new(),
            deadzone: 0.05,
            engine: EngineConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.tick_hz.is_finite() && self.tick_hz > 0.0,
            "tick_hz must be positive, got {}",
            self.tick_hz
        );
        ensure!(
            self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0,
            "max_frame_dt must be positive, got {}",
            self.max_frame_dt
        );
        ensure!(
            self.duration_s.is_finite() && self.duration_s >= 0.0,
            "duration_s must be non-negative, got {}",
            self.duration_s
        );
        ensure!(self.initial_position.is_finite(), "initial_position must be finite");
        ensure!(
            self.initial_pitch_deg.is_finite(),
            "initial_pitch_deg must be finite, got {}",
            self.initial_pitch_deg
        );
        ensure!(
            self.handles.left.is_finite() && self.handles.right.is_finite(),
            "handles must be finite"
        );
        self.engine.validate().context("invalid engine configuration")?;
        Ok(())
    }

    /// Fixed step size: the tick period, capped at `max_frame_dt`.
    pub fn dt(&self) -> f64 {
        (1.0 / self.tick_hz).min(self.max_frame_dt)
    }

    /// Raw steer from the latest segment that has started by `time`.
    pub fn steer_at(&self, time: f64) -> f64 {
        self.steer_schedule
            .iter()
            .filter(|s| s.start_s <= time)
            .max_by(|a, b| a.start_s.total_cmp(&b.start_s))
            .map_or(0.0, |s| s.steer)
    }
}

/// Load a run configuration; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<SimConfig> {
    if !path.exists() {
        info!(path = %path.display(), "Config file not found; using defaults");
        return Ok(SimConfig::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: SimConfig =
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: u64,
    pub sim_time: f64,
    pub final_position: Vec3d,
    pub final_orientation: Quatd,
    pub final_velocity: Vec3d,
    pub final_airspeed: f64,
    /// (left, right) at the last step.
    pub final_tensions: (f64, f64),
    pub max_tension: f64,
    pub max_airspeed: f64,
    pub ground_contacts: u64,
}

pub fn run(cfg: &SimConfig) -> Result<RunSummary> {
    cfg.validate()?;
    let spec = cfg.kite.spec();
    let mut engine =
        PhysicsEngine::new(&spec, cfg.engine.clone()).context("building physics engine")?;
    let launch = Quatd::from_rotation_x(cfg.initial_pitch_deg.to_radians());
    let mut state = KiteState::new(&spec, cfg.initial_position, launch);

    let dt = cfg.dt();
    let total_steps = (cfg.duration_s / dt).round() as u64;
    let mut summary = RunSummary {
        steps: 0,
        sim_time: 0.0,
        final_position: state.position,
        final_orientation: state.orientation,
        final_velocity: Vec3d::ZERO,
        final_airspeed: 0.0,
        final_tensions: (0.0, 0.0),
        max_tension: 0.0,
        max_airspeed: 0.0,
        ground_contacts: 0,
    };

    for tick in 0..total_steps {
        let control = ControlInput::from_raw(cfg.steer_at(summary.sim_time), cfg.deadzone);
        let metrics = engine.step(dt, &mut state, control, &cfg.handles);
        summary.sim_time += dt;
        summary.steps += 1;

        if state.position.y < cfg.ground_y {
            state.position.y = cfg.ground_y;
            engine.resolve_contact(Vec3d::Y);
            summary.ground_contacts += 1;
            debug!(tick, x = state.position.x, z = state.position.z, "Ground contact");
        }

        summary.max_tension = summary.max_tension.max(metrics.max_tension);
        summary.max_airspeed = summary.max_airspeed.max(metrics.airspeed);
        summary.final_airspeed = metrics.airspeed;
        summary.final_tensions = (metrics.left_tension, metrics.right_tension);

        if cfg.log_every > 0 && tick % cfg.log_every == 0 {
            info!(
                t = summary.sim_time,
                pos = ?state.position,
                steer = control.steer,
                airspeed = metrics.airspeed,
                aoa_deg = metrics.angle_of_attack_deg,
                left_tension = metrics.left_tension,
                right_tension = metrics.right_tension,
                calm = metrics.calm,
                "Kite telemetry"
            );
        }
    }

    summary.final_position = state.position;
    summary.final_orientation = state.orientation;
    summary.final_velocity = engine.velocity();
    Ok(summary)
}
