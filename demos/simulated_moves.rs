//! Simulated moves on a three-axis machine.
//!
//! Demonstrates:
//! - Loading a machine from TOML
//! - Running line and arc moves into a `BufferedScheduler`
//! - Draining the queue the way a timer interrupt would
//!
//! Run with: `cargo run --example simulated_moves`

use core::time::Duration;

use axis_stepper::{
    parse_config, ArcPath, BufferedScheduler, LinePath, Machine, Result, Vector3, Vector4,
};

const CONFIG: &str = r#"
[timing]
pulse_width_ns = 2000
dir_setup_ns = 200

[[axes]]
name = "x"
coordinate = "x"
full_steps_per_revolution = 200
microsteps = 16
units_per_revolution = 40.0
step_pin = 17
dir_pin = 27

[axes.endstops]
min_mm = 0.0
max_mm = 200.0

[[axes]]
name = "y"
coordinate = "y"
full_steps_per_revolution = 200
microsteps = 16
units_per_revolution = 40.0
step_pin = 22
dir_pin = 23

[axes.endstops]
min_mm = 0.0
max_mm = 200.0

[[axes]]
name = "e"
coordinate = "e"
full_steps_per_revolution = 200
microsteps = 16
units_per_revolution = 33.0
step_pin = 5
dir_pin = 6
"#;

fn drain(scheduler: &mut BufferedScheduler<8192>) -> usize {
    let mut emitted = 0;
    let mut now = Duration::ZERO;
    while !scheduler.is_empty() {
        now += Duration::from_micros(50);
        while scheduler.pop_due(now).is_some() {
            emitted += 1;
        }
    }
    emitted
}

fn main() -> Result<()> {
    println!("=== Simulated Moves Example ===\n");

    let config = parse_config(CONFIG)?;
    let mut machine = Machine::<3>::from_config(config)?;
    let mut scheduler = BufferedScheduler::<8192>::new();

    machine.set_cartesian_position(&Vector4::new(10.0, 10.0, 0.0, 0.0));
    println!("Start position: {:?} steps", machine.position().steps());

    // 10 mm diagonal at ~14 mm/s while extruding
    let line = LinePath::new(Vector4::new(10.0, 10.0, 0.0, 0.5), 1.0);
    let summary = machine.line(&mut scheduler, &line)?;
    println!(
        "Line: {} steps, last at {:?}, {} events emitted",
        summary.steps,
        summary.last_step_time,
        drain(&mut scheduler)
    );

    // Half circle of radius 5 mm around (20, 15)
    let arc = ArcPath {
        center: Vector3::new(20.0, 15.0, 0.0),
        u: Vector3::new(0.0, 1.0, 0.0),
        v: Vector3::new(-1.0, 0.0, 0.0),
        radius: 5.0,
        angular_velocity: core::f32::consts::PI,
        extrusion_velocity: 0.5,
        duration: 1.0,
    };
    let summary = machine.arc(&mut scheduler, &arc)?;
    println!(
        "Arc: {} steps, last at {:?}, {} events emitted",
        summary.steps,
        summary.last_step_time,
        drain(&mut scheduler)
    );

    // Run into the X endstop
    let line = LinePath::new(Vector4::new(-50.0, 0.0, 0.0, 0.0), 1.0);
    let summary = machine.line(&mut scheduler, &line)?;
    println!(
        "Homing X: {} steps, halted axes {:?}",
        summary.steps,
        summary.halted.as_slice()
    );
    drain(&mut scheduler);

    for (i, name) in machine.config().axis_names().enumerate() {
        println!(
            "  {}: {} steps ({:.3} mm)",
            name,
            machine.position().axis_steps(i).0,
            machine.position().axis_millimeters(i).0
        );
    }

    Ok(())
}
