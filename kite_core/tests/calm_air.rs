use kite_core::{
    kitespecs, ControlInput, EngineConfig, Handles, KiteState, PhysicsConfig, PhysicsEngine,
    Quatd, Vec3d, WindConfig,
};

#[test]
fn kite_at_rest_in_calm_weightless_air_stays_put() {
    let spec = kitespecs::diamond_kite_spec();
    let config = EngineConfig {
        physics: PhysicsConfig {
            gravity: 0.0,
            ..PhysicsConfig::default()
        },
        wind: WindConfig {
            speed: 0.0,
            turbulence: 0.0,
            ..WindConfig::default()
        },
        ..EngineConfig::default()
    };
    let mut engine = PhysicsEngine::new(&spec, config).unwrap();
    let handles = Handles::new(Vec3d::new(-0.3, 1.0, 0.0), Vec3d::new(0.3, 1.0, 0.0));
    // Full steer shortens the left line to 13.5 m; stay inside it
    let start = Vec3d::new(0.0, 8.0, 10.0);
    let orientation = Quatd::from_rotation_x(-0.4);
    let mut state = KiteState::new(&spec, start, orientation);

    for i in 0..90 {
        let m = engine.step(1.0 / 60.0, &mut state, ControlInput { steer: 1.0 }, &handles);
        assert!(m.calm, "step {i}: expected a calm step");
        assert_eq!(m.total_force, Vec3d::ZERO);
        assert_eq!(m.torque, Vec3d::ZERO);
        assert_eq!(m.aero_force, Vec3d::ZERO);
        assert_eq!(m.left_tension, 0.0);
        assert_eq!(m.right_tension, 0.0);
        assert_eq!(m.airspeed, 0.0);
        assert!(m.panels.is_empty());
        assert_eq!(engine.velocity(), Vec3d::ZERO);
        assert_eq!(engine.angular_velocity(), Vec3d::ZERO);
        assert_eq!(state.position, start, "step {i}: kite moved");
        assert!(state.orientation.abs_diff_eq(orientation, 1e-12));
    }
}
