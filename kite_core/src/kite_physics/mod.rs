mod util;
mod types;
mod wind;
mod aero;
mod lines;
mod terms;
mod engine;

pub use types::{ControlInput, Handles, KiteState, PanelForce, StepMetrics};
pub use wind::WindModel;
pub use aero::{AerodynamicsCalculator, AeroForces};
pub use lines::{LineConstraintSystem, LineTensions};
pub use engine::PhysicsEngine;
