use serde::{Deserialize, Serialize};

use crate::config::{positive, ConfigError};
use crate::math::{normalize_or_none, triangle_area, triangle_centroid, triangle_cross, Vec3d};

// Edge cross products shorter than this are treated as degenerate panels.
const DEGENERATE_NORMAL_EPS: f64 = 1e-9;

/// Which line/half of the kite a panel or attachment belongs to.
/// Body −X is left, +X is right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// One flat triangular sail section in the kite body frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "[Vec3d; 3]", into = "[Vec3d; 3]")]
pub struct Panel {
    pub vertices: [Vec3d; 3],
    pub area: f64,
    /// Unit normal from the vertex winding; `None` for a degenerate triangle.
    pub normal: Option<Vec3d>,
    pub centroid: Vec3d,
}

impl Panel {
    pub fn new(a: Vec3d, b: Vec3d, c: Vec3d) -> Self {
        Self {
            vertices: [a, b, c],
            area: triangle_area(a, b, c),
            normal: normalize_or_none(triangle_cross(a, b, c), DEGENERATE_NORMAL_EPS),
            centroid: triangle_centroid(a, b, c),
        }
    }

    pub fn side(&self) -> Side {
        if self.centroid.x < 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }
}

impl From<[Vec3d; 3]> for Panel {
    fn from([a, b, c]: [Vec3d; 3]) -> Self {
        Panel::new(a, b, c)
    }
}

impl From<Panel> for [Vec3d; 3] {
    fn from(p: Panel) -> Self {
        p.vertices
    }
}

/// Sail panels plus the two bridle points where the lines attach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KiteGeometry {
    pub panels: Vec<Panel>,
    pub left_attachment: Vec3d,
    pub right_attachment: Vec3d,
}

impl KiteGeometry {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.panels.iter().any(|p| p.normal.is_some() && p.area > 0.0) {
            return Err(ConfigError::EmptyGeometry);
        }
        if !self.left_attachment.is_finite() || !self.right_attachment.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "geometry.attachment",
            });
        }
        Ok(())
    }

    pub fn total_area(&self) -> f64 {
        self.panels.iter().map(|p| p.area).sum()
    }

    pub fn attachment(&self, side: Side) -> Vec3d {
        match side {
            Side::Left => self.left_attachment,
            Side::Right => self.right_attachment,
        }
    }
}

/// Rigid-body parameters for a specific kite design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KiteSpec {
    pub geometry: KiteGeometry,
    /// kg
    pub mass: f64,
    /// Isotropic moment of inertia (kg·m²).
    pub inertia: f64,
}

impl KiteSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("kite.mass", self.mass)?;
        positive("kite.inertia", self.inertia)?;
        self.geometry.validate()
    }
}

pub mod kitespecs {
    use super::*;

    // Body frame for the built-ins: +Z is the downwind face normal, +Y up,
    // −X left. Bridle points sit on the upwind (pilot) side.

    /// Small four-panel delta, symmetric left/right.
    pub fn delta_kite_spec() -> KiteSpec {
        let nose = Vec3d::new(0.0, 0.7, 0.0);
        let spar = Vec3d::new(0.0, 0.1, 0.0);
        // Tail bent downwind for pitch stiffness
        let tail = Vec3d::new(0.0, -0.5, 0.3);
        // Wingtips swept downwind for dihedral
        let left_tip = Vec3d::new(-0.8, 0.0, 0.12);
        let right_tip = Vec3d::new(0.8, 0.0, 0.12);

        KiteSpec {
            geometry: KiteGeometry {
                panels: vec![
                    Panel::new(nose, left_tip, spar),
                    Panel::new(spar, left_tip, tail),
                    Panel::new(nose, spar, right_tip),
                    Panel::new(spar, right_tip, tail),
                ],
                // Bridle knot upwind of the sail and level with the spar
                left_attachment: Vec3d::new(-0.35, 0.05, -0.4),
                right_attachment: Vec3d::new(0.35, 0.05, -0.4),
            },
            mass: 0.35,
            inertia: 0.06,
        }
    }

    /// Four-panel diamond, symmetric left/right and top/bottom.
    pub fn diamond_kite_spec() -> KiteSpec {
        // Bowed spine: both ends swept downwind
        let top = Vec3d::new(0.0, 0.6, 0.15);
        let center = Vec3d::new(0.0, 0.0, 0.0);
        let bottom = Vec3d::new(0.0, -0.6, 0.15);
        let left = Vec3d::new(-0.5, 0.0, 0.08);
        let right = Vec3d::new(0.5, 0.0, 0.08);

        KiteSpec {
            geometry: KiteGeometry {
                panels: vec![
                    Panel::new(top, left, center),
                    Panel::new(center, left, bottom),
                    Panel::new(top, center, right),
                    Panel::new(center, right, bottom),
                ],
                left_attachment: Vec3d::new(-0.3, 0.1, -0.4),
                right_attachment: Vec3d::new(0.3, 0.1, -0.4),
            },
            mass: 0.25,
            inertia: 0.04,
        }
    }
}
