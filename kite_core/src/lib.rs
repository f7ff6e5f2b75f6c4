//! Physics core for a two-line kite.
//!
//! This crate intentionally avoids any rendering or windowing types. It exposes
//! plain data in and out: a host feeds control input, handle positions and a
//! frame `dt`, and reads back the mutated `KiteState` plus a `StepMetrics`
//! record for UI/debug consumers.

mod math;
pub use math::{Quatd, Vec3d};
pub use math::{finite_or_zero, integrate_orientation, normalize_or_none};

mod config;
pub use config::{
    AeroConfig, ConfigError, EngineConfig, LineConstraintConfig, PhysicsConfig, StallConfig,
    WindConfig,
};

mod kite_specs;
pub use kite_specs::kitespecs;
pub use kite_specs::{KiteGeometry, KiteSpec, Panel, Side};

pub mod kite_physics;
pub use kite_physics::{
    AerodynamicsCalculator, AeroForces, ControlInput, Handles, KiteState, LineConstraintSystem,
    LineTensions, PanelForce, PhysicsEngine, StepMetrics, WindModel,
};
