use kite_core::{
    kitespecs, ControlInput, EngineConfig, Handles, KiteState, PhysicsEngine, Quatd, Side, Vec3d,
    WindConfig,
};

#[test]
fn strong_wind_keeps_kite_within_line_reach() {
    let spec = kitespecs::delta_kite_spec();
    let config = EngineConfig {
        wind: WindConfig {
            speed: 18.0,
            turbulence: 0.3,
            ..WindConfig::default()
        },
        ..EngineConfig::default()
    };
    let mut engine = PhysicsEngine::new(&spec, config).unwrap();
    let handles = Handles::new(Vec3d::new(-0.3, 1.0, 0.0), Vec3d::new(0.3, 1.0, 0.0));
    let mut state = KiteState::new(&spec, Vec3d::new(0.0, 6.0, 6.0), Quatd::IDENTITY);
    let tolerance = engine.config().lines.tolerance;
    let dt = 1.0 / 60.0;
    let mut saw_tension = false;

    for i in 0..600 {
        let steer = if (i / 120) % 2 == 0 { 0.5 } else { -0.5 };
        let m = engine.step(dt, &mut state, ControlInput { steer }, &handles);
        saw_tension |= m.max_tension > 0.0;

        let right = (state.position - handles.right).length();
        let right_max = engine.lines().effective_length(Side::Right);
        assert!(
            right <= right_max + tolerance + 1e-9,
            "step {i}: right line overstretched {right} > {right_max}"
        );
        // The right projection moves toward the right handle, which sits
        // inside the left sphere, so it cannot push past the left length.
        let left = (state.position - handles.left).length();
        let left_max = engine.lines().effective_length(Side::Left);
        assert!(
            left <= left_max + tolerance + 1e-9,
            "step {i}: left line overstretched {left} > {left_max}"
        );
    }
    assert!(saw_tension, "kite never reached the end of its lines");
}
