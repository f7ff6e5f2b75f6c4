use std::path::Path;

use sim::{load_config, run, KiteKind, SimConfig, SteerSegment};

#[test]
fn default_run_flies_on_taut_lines() {
    let cfg = SimConfig {
        duration_s: 10.0,
        log_every: 0,
        ..SimConfig::default()
    };
    let summary = run(&cfg).expect("run succeeds");

    assert_eq!(summary.steps, 600);
    assert!((summary.sim_time - 10.0).abs() < 1e-6, "sim_time = {}", summary.sim_time);
    assert!(summary.final_position.is_finite(), "pos = {:?}", summary.final_position);
    assert!(summary.final_position.y >= cfg.ground_y);
    assert!((summary.final_orientation.length() - 1.0).abs() < 1e-9);
    assert!(summary.max_airspeed > 0.0);
    assert!(
        summary.max_tension > 0.0,
        "the kite should reach the end of its lines in 10 s of wind"
    );
    assert_eq!(summary.ground_contacts, 0, "default kite should never touch down");
    assert!(
        summary.final_position.y > cfg.handles.left.y + 3.0,
        "kite should end well above the bar: {:?}",
        summary.final_position
    );
    let (left, right) = summary.final_tensions;
    assert!(left > 0.0 && right > 0.0, "both lines should end taut: ({left}, {right})");
}

#[test]
fn sample_config_flies_without_touching_ground() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../kite_sim.toml");
    let mut cfg = load_config(&path).unwrap();
    cfg.log_every = 0;
    assert!(!cfg.steer_schedule.is_empty(), "sample should script some steering");

    let summary = run(&cfg).unwrap();
    assert_eq!(summary.ground_contacts, 0, "final position {:?}", summary.final_position);
    assert!(summary.final_position.y > cfg.handles.left.y);
}

#[test]
fn scripted_steering_moves_kite_sideways() {
    let base = SimConfig {
        duration_s: 6.0,
        log_every: 0,
        ..SimConfig::default()
    };
    let steered = SimConfig {
        steer_schedule: vec![SteerSegment {
            start_s: 1.0,
            steer: 1.0,
        }],
        ..base.clone()
    };

    let straight = run(&base).unwrap();
    let turned = run(&steered).unwrap();
    assert!(
        (straight.final_position.x - turned.final_position.x).abs() > 1e-3,
        "steering had no lateral effect: {:?} vs {:?}",
        straight.final_position,
        turned.final_position
    );
}

#[test]
fn calm_day_kite_lands_and_rests_on_ground() {
    let mut cfg = SimConfig {
        duration_s: 10.0,
        log_every: 0,
        kite: KiteKind::Diamond,
        ..SimConfig::default()
    };
    cfg.engine.wind.speed = 0.0;
    let summary = run(&cfg).unwrap();
    assert!(summary.ground_contacts > 0, "kite never hit the ground");
    assert_eq!(summary.final_position.y, cfg.ground_y);

    // Resting on the ground: no fall speed carried over, no phantom airflow
    assert!(
        summary.final_velocity.y.abs() < 1e-12,
        "vertical velocity kept growing: {:?}",
        summary.final_velocity
    );
    assert!(summary.final_airspeed < 0.05, "airspeed = {}", summary.final_airspeed);
}

#[test]
fn missing_file_gives_defaults_and_partial_toml_parses() {
    let cfg = load_config(Path::new("does/not/exist/kite_sim.toml")).unwrap();
    assert_eq!(cfg.tick_hz, SimConfig::default().tick_hz);

    let text = r#"
        duration_s = 2.5
        kite = "diamond"
        initial_position = [0.0, 6.0, 9.0]

        [[steer_schedule]]
        start_s = 0.5
        steer = -0.3

        [engine.wind]
        speed = 7.0
    "#;
    let path = std::env::temp_dir().join(format!("kite_sim_test_{}.toml", std::process::id()));
    std::fs::write(&path, text).unwrap();
    let cfg = load_config(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.duration_s, 2.5);
    assert_eq!(cfg.kite, KiteKind::Diamond);
    assert_eq!(cfg.initial_position.y, 6.0);
    assert_eq!(cfg.steer_at(1.0), -0.3);
    assert_eq!(cfg.engine.wind.speed, 7.0);
    assert_eq!(cfg.engine.wind.turbulence, 0.1);
    assert_eq!(cfg.engine.lines.base_length, 15.0);
}

#[test]
fn malformed_toml_is_an_error() {
    let path = std::env::temp_dir().join(format!("kite_sim_bad_{}.toml", std::process::id()));
    std::fs::write(&path, "tick_hz = \"fast\"").unwrap();
    let result = load_config(&path);
    std::fs::remove_file(&path).ok();
    assert!(result.is_err());
}
