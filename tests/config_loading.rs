//! Configuration parsing, validation and machine construction from TOML.

use core::time::Duration;

use axis_stepper::config::{parse_config, validate_config, AxisCoordinate, MachineConfig, StepLimits};
use axis_stepper::config::units::Microsteps;
use axis_stepper::error::{ConfigError, Error};
use axis_stepper::kinematics::LinePath;
use axis_stepper::machine::Machine;
use axis_stepper::motion::Vector4;
use axis_stepper::output::BufferedScheduler;

const COREXY_CONFIG: &str = r#"
[timing]
pulse_width_ns = 2500
dir_setup_ns = 500
use_endstops = false

[[axes]]
name = "a"
coordinate = "a"
full_steps_per_revolution = 200
microsteps = 16
units_per_revolution = 40.0
step_pin = 17
dir_pin = 27

[axes.endstops]
min_mm = -10.0
max_mm = 300.0

[[axes]]
name = "b"
coordinate = "b"
full_steps_per_revolution = 200
microsteps = 16
units_per_revolution = 40.0
step_pin = 22
dir_pin = 23
invert_direction = true
"#;

#[test]
fn parse_corexy_config() {
    let config = parse_config(COREXY_CONFIG).expect("Should parse CoreXY config");

    assert_eq!(config.axis_count(), 2);
    assert_eq!(config.timing.pulse_width(), Duration::from_nanos(2500));
    assert_eq!(config.timing.dir_setup(), Duration::from_nanos(500));
    assert!(!config.timing.use_endstops);

    let a = config.axis("a").expect("Axis a should exist");
    assert_eq!(a.coordinate, AxisCoordinate::A);
    assert_eq!(a.microsteps, Microsteps::SIXTEENTH);
    assert!((a.steps_per_mm() - 80.0).abs() < 1e-4);
    assert_eq!(a.step_limits(), Some(StepLimits::new(-800, 24_000)));

    let b = config.axis("b").expect("Axis b should exist");
    assert!(b.invert_direction);
    assert!(b.endstops.is_none());
    assert_eq!(config.axis_index("b"), Some(1));
}

#[test]
fn duplicate_pin_rejected() {
    let toml_str = COREXY_CONFIG.replace("step_pin = 22", "step_pin = 27");
    let err = parse_config(&toml_str).unwrap_err();
    assert_eq!(err, Error::Config(ConfigError::DuplicatePin(27)));
}

#[test]
fn duplicate_name_rejected() {
    let toml_str = COREXY_CONFIG.replace("name = \"b\"", "name = \"a\"");
    let err = parse_config(&toml_str).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::DuplicateAxisName(_))));
}

#[test]
fn inverted_endstops_rejected() {
    let toml_str = COREXY_CONFIG.replace("max_mm = 300.0", "max_mm = -20.0");
    let err = parse_config(&toml_str).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::InvalidEndstopLimits { .. })));
}

#[test]
fn empty_config_rejected() {
    assert_eq!(
        validate_config(&MachineConfig::default()),
        Err(Error::Config(ConfigError::NoAxes))
    );
}

#[test]
fn corexy_machine_moves_both_motors() {
    let config = parse_config(COREXY_CONFIG).unwrap();
    let mut machine = Machine::<2>::from_config(config).unwrap();
    let mut sched = BufferedScheduler::<4096>::new();

    // 1 mm along +X moves both belts forward 80 steps.
    machine
        .line(&mut sched, &LinePath::new(Vector4::new(1.0, 0.0, 0.0, 0.0), 1.0))
        .unwrap();
    assert_eq!(machine.position().steps(), &[80, 80]);

    // 1 mm along +Y moves them in opposite directions.
    sched.clear();
    machine
        .line(&mut sched, &LinePath::new(Vector4::new(0.0, 1.0, 0.0, 0.0), 1.0))
        .unwrap();
    assert_eq!(machine.position().steps(), &[160, 0]);
    assert_eq!(machine.cursor(), Duration::from_secs(2));

    // B has inverted direction logic: its backward steps drive DIR high.
    let b_dir = machine.drivers()[1].dir_pin();
    assert!(sched
        .events()
        .filter(|e| e.pin() == b_dir)
        .all(|e| e.state() == embedded_hal::digital::PinState::High));
}
