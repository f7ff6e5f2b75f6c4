use tracing::warn;

use crate::{AeroConfig, ConfigError, Panel, Quatd, Side, Vec3d};
use crate::math::normalize_or_none;
use super::types::PanelForce;
use super::util::{GEOMETRY_EPS, LOG_TARGET};

/// Result of one aerodynamic evaluation. Forces and torque are world frame;
/// torque is about the kite reference point.
#[derive(Debug, Clone)]
pub struct AeroForces {
    pub total_force: Vec3d,
    pub torque: Vec3d,
    pub left_force: Vec3d,
    pub right_force: Vec3d,
    pub panels: Vec<PanelForce>,
    pub angle_of_attack_deg: f64,
    pub stall_factor: f64,
    pub dynamic_pressure: f64,
}

impl AeroForces {
    pub fn zero() -> Self {
        Self {
            total_force: Vec3d::ZERO,
            torque: Vec3d::ZERO,
            left_force: Vec3d::ZERO,
            right_force: Vec3d::ZERO,
            panels: Vec::new(),
            angle_of_attack_deg: 0.0,
            stall_factor: 1.0,
            dynamic_pressure: 0.0,
        }
    }
}

/// Pure normal-pressure model over the kite's fixed panels.
///
/// Every panel is pushed along its normal, away from the side the apparent
/// wind strikes, with magnitude `q · area · |cos incidence|`. There is no
/// lift/drag decomposition; turning moments emerge from the per-panel lever
/// arms alone.
#[derive(Debug, Clone)]
pub struct AerodynamicsCalculator {
    panels: Vec<Panel>,
    config: AeroConfig,
    stalled: bool,
}

impl AerodynamicsCalculator {
    pub fn new(panels: Vec<Panel>, config: AeroConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        for (i, p) in panels.iter().enumerate() {
            if p.normal.is_none() {
                warn!(target: LOG_TARGET, panel = i, area = p.area, "Degenerate panel normal; panel will be skipped");
            }
        }
        Ok(Self {
            panels,
            config,
            stalled: false,
        })
    }

    pub fn config(&self) -> &AeroConfig {
        &self.config
    }

    pub fn update_config(&mut self, config: AeroConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    pub fn reset(&mut self) {
        self.stalled = false;
    }

    pub fn calculate_forces(
        &mut self,
        apparent_wind: Vec3d,
        orientation: Quatd,
        air_density: f64,
    ) -> AeroForces {
        let dynamic_pressure = 0.5 * air_density * apparent_wind.length_squared();
        if !dynamic_pressure.is_finite() || dynamic_pressure <= 0.0 {
            return AeroForces::zero();
        }
        let Some(wind_dir) = normalize_or_none(apparent_wind, GEOMETRY_EPS) else {
            return AeroForces::zero();
        };

        let mut out = AeroForces::zero();
        out.dynamic_pressure = dynamic_pressure;
        let mut effective_normal = Vec3d::ZERO;

        for panel in &self.panels {
            let Some(normal_local) = panel.normal else {
                continue;
            };
            let normal_world = orientation * normal_local;
            let centroid_world = orientation * panel.centroid;
            let side = panel.side();

            let facing = wind_dir.dot(normal_world);
            let cos_incidence = facing.abs();
            if cos_incidence <= GEOMETRY_EPS {
                // Edge-on to the flow
                out.panels.push(PanelForce {
                    side,
                    force: Vec3d::ZERO,
                    normal: normal_world,
                    centroid: centroid_world,
                    cos_incidence: 0.0,
                    area: panel.area,
                });
                continue;
            }

            let push_dir = normal_world * facing.signum();
            let magnitude = dynamic_pressure * panel.area * cos_incidence * self.config.lift_scale;
            let force = push_dir * magnitude;

            out.total_force += force;
            out.torque += centroid_world.cross(force);
            match side {
                Side::Left => out.left_force += force,
                Side::Right => out.right_force += force,
            }
            effective_normal += push_dir * (panel.area * cos_incidence);
            out.panels.push(PanelForce {
                side,
                force,
                normal: push_dir,
                centroid: centroid_world,
                cos_incidence,
                area: panel.area,
            });
        }

        out.angle_of_attack_deg = match normalize_or_none(effective_normal, GEOMETRY_EPS) {
            Some(n) => 90.0 - n.dot(wind_dir).clamp(-1.0, 1.0).acos().to_degrees(),
            None => 0.0,
        };

        let stall_factor = self.update_stall(out.angle_of_attack_deg);
        if stall_factor < 1.0 {
            out.total_force *= stall_factor;
            out.torque *= stall_factor;
            out.left_force *= stall_factor;
            out.right_force *= stall_factor;
            for p in &mut out.panels {
                p.force *= stall_factor;
            }
        }
        out.stall_factor = stall_factor;
        out
    }

    // Hysteresis: enter past `stall_angle_deg`, leave below `recovery_angle_deg`.
    // While stalled the factor eases from 1 at the recovery angle down to
    // `min_factor` at 90°.
    fn update_stall(&mut self, aoa_deg: f64) -> f64 {
        let stall = &self.config.stall;
        if !stall.enabled {
            self.stalled = false;
            return 1.0;
        }
        if self.stalled {
            if aoa_deg < stall.recovery_angle_deg {
                self.stalled = false;
            }
        } else if aoa_deg > stall.stall_angle_deg {
            self.stalled = true;
        }
        if !self.stalled {
            return 1.0;
        }
        let span = (90.0 - stall.recovery_angle_deg).max(1e-6);
        let t = ((aoa_deg - stall.recovery_angle_deg) / span).clamp(0.0, 1.0);
        let eased = t * t * (3.0 - 2.0 * t);
        1.0 - (1.0 - stall.min_factor) * eased
    }
}
