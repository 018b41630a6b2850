//! Integration tests for axis-stepper.
//!
//! These tests drive complete moves from path description to queued pin events.

use core::time::Duration;

use axis_stepper::config::{AxisCoordinate, StepLimits};
use axis_stepper::error::{Error, ScheduleError};
use axis_stepper::kinematics::{ArcPath, CoordMap, LinePath, LinearCoordMap};
use axis_stepper::motion::{
    ArcMotion, AxisPhase, AxisSet, LineMotion, MoveExecutor, StepDirection, Vector3, Vector4,
};
use axis_stepper::output::{BufferedScheduler, HardwareScheduler, PinId, StepDirDriver};
use embedded_hal::digital::PinState;

// =============================================================================
// Helpers
// =============================================================================

/// Coordinate map with fixed per-axis trajectories, ignoring the path.
struct FixedMap([LineMotion; 2]);

impl CoordMap<2> for FixedMap {
    fn begin_line(&self, axis: usize, _position: &[i32; 2], _path: &LinePath) -> LineMotion {
        self.0[axis]
    }

    fn begin_arc(&self, axis: usize, _position: &[i32; 2], _path: &ArcPath) -> ArcMotion {
        ArcMotion::Linear(self.0[axis])
    }
}

fn xy_map() -> LinearCoordMap<2> {
    LinearCoordMap::new([(AxisCoordinate::X, 1.0), (AxisCoordinate::Y, 1.0)])
}

fn drivers() -> [StepDirDriver; 2] {
    let pulse = Duration::from_micros(2);
    [
        StepDirDriver::new(PinId(10), PinId(11), false, Duration::ZERO, pulse),
        StepDirDriver::new(PinId(20), PinId(21), false, Duration::ZERO, pulse),
    ]
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// =============================================================================
// Selection sequence
// =============================================================================

#[test]
fn two_axis_selection_sequence() {
    let map = FixedMap([
        // Steps at 1.0, 2.0, 3.0
        LineMotion::new(0.0, 1.0, 3.5),
        // Steps at 1.5, 4.0
        LineMotion::new(0.4, 0.4, 4.5),
    ]);
    let mut set = AxisSet::<2>::unbounded();
    set.init_line(false, &map, &[0, 0], &LinePath::new(Vector4::default(), 0.0));

    let expected = [(0, 1.0), (1, 1.5), (0, 2.0), (0, 3.0), (1, 4.0)];
    for (axis, time) in expected {
        let step = set.next_step().expect("move ended early");
        assert_eq!(step.axis, axis);
        assert!(approx(step.time, time), "axis {} at {} != {}", axis, step.time, time);
        assert_eq!(step.direction, StepDirection::Forward);
        set.advance_indexed(step.axis, false);
    }

    assert!(set.is_complete());
    assert!(set.next_step().is_none());
    assert_eq!(set.positions(), [3, 2]);
    assert!(set.axes().iter().all(|s| s.phase() == AxisPhase::Finished));
}

#[test]
fn terminal_axes_stay_terminal() {
    let map = FixedMap([LineMotion::new(0.0, 1.0, 1.0), LineMotion::new(0.0, 1.0, 1.0)]);
    let mut set = AxisSet::<2>::unbounded();
    set.init_line(false, &map, &[0, 0], &LinePath::new(Vector4::default(), 0.0));

    set.advance_indexed(0, false);
    set.advance_indexed(1, false);
    assert!(set.is_complete());

    for _ in 0..3 {
        set.advance_indexed(0, false);
        set.advance_indexed(1, false);
    }
    assert!(set.is_complete());
    assert_eq!(set.positions(), [1, 1]);
}

// =============================================================================
// Endstops
// =============================================================================

#[test]
fn endstop_stops_axis_after_second_step() {
    let mut set = AxisSet::new([Some(StepLimits::new(0, 2)), None]);
    set.init_line(
        true,
        &xy_map(),
        &[0, 0],
        &LinePath::new(Vector4::new(1.0, 0.5, 0.0, 0.0), 10.0),
    );

    let mut sched = BufferedScheduler::<64>::new();
    let mut exec = MoveExecutor::new(set, Duration::ZERO, true);
    let summary = exec.run_to_completion(&drivers(), &mut sched).unwrap();

    assert_eq!(summary.halted.as_slice(), &[0]);
    assert_eq!(summary.steps, 7);
    assert_eq!(exec.axes().positions(), [2, 5]);
    assert_eq!(exec.axes().axes()[0].phase(), AxisPhase::EndstopHalted);

    let x_pulses = sched
        .events()
        .filter(|e| e.pin() == PinId(10) && e.state() == PinState::High)
        .count();
    let y_pulses = sched
        .events()
        .filter(|e| e.pin() == PinId(20) && e.state() == PinState::High)
        .count();
    assert_eq!(x_pulses, 2);
    assert_eq!(y_pulses, 5);
}

#[test]
fn endstops_ignored_when_disabled() {
    let mut set = AxisSet::new([Some(StepLimits::new(0, 2)), None]);
    set.init_line(
        false,
        &xy_map(),
        &[0, 0],
        &LinePath::new(Vector4::new(1.0, 0.0, 0.0, 0.0), 5.0),
    );

    let mut sched = BufferedScheduler::<64>::new();
    let summary = MoveExecutor::new(set, Duration::ZERO, false)
        .run_to_completion(&drivers(), &mut sched)
        .unwrap();

    assert_eq!(summary.steps, 5);
    assert!(summary.halted.is_empty());
}

// =============================================================================
// Degenerate input
// =============================================================================

#[test]
fn zero_radius_arc_is_terminal() {
    let mut set = AxisSet::<2>::unbounded();
    set.init_arc(
        false,
        &xy_map(),
        &[4, 4],
        &ArcPath {
            center: Vector3::new(4.0, 4.0, 0.0),
            u: Vector3::new(1.0, 0.0, 0.0),
            v: Vector3::new(0.0, 1.0, 0.0),
            radius: 0.0,
            angular_velocity: 3.0,
            extrusion_velocity: 0.0,
            duration: 10.0,
        },
    );

    assert!(set.is_complete());
    for s in set.axes() {
        assert_eq!(s.phase(), AxisPhase::Finished);
        assert_eq!(s.time(), 0.0);
    }
}

#[test]
fn non_finite_velocity_only_stops_that_axis() {
    let mut set = AxisSet::<2>::unbounded();
    set.init_line(
        false,
        &xy_map(),
        &[0, 0],
        &LinePath::new(Vector4::new(f32::NAN, 1.0, 0.0, 0.0), 3.0),
    );

    assert_eq!(set.axes()[0].phase(), AxisPhase::Finished);
    assert!(!set.axes()[0].time().is_nan());

    let step = set.next_step().unwrap();
    assert_eq!(step.axis, 1);
    assert!(approx(step.time, 1.0));
}

#[test]
fn quarter_circle_arc_steps_both_axes() {
    // Start at (10, 0), quarter turn counterclockwise to (0, 10).
    let mut set = AxisSet::<2>::unbounded();
    set.init_arc(
        false,
        &xy_map(),
        &[10, 0],
        &ArcPath {
            center: Vector3::default(),
            u: Vector3::new(1.0, 0.0, 0.0),
            v: Vector3::new(0.0, 1.0, 0.0),
            radius: 10.0,
            angular_velocity: core::f32::consts::FRAC_PI_2,
            extrusion_velocity: 0.0,
            duration: 1.0,
        },
    );

    let mut last = 0.0;
    let mut steps = 0;
    while let Some(step) = set.next_step() {
        assert!(step.time >= last);
        assert!(step.time <= 1.0);
        let expected = if step.axis == 0 {
            StepDirection::Backward
        } else {
            StepDirection::Forward
        };
        assert_eq!(step.direction, expected);
        last = step.time;
        steps += 1;
        set.advance_indexed(step.axis, false);
    }

    assert_eq!(set.positions(), [0, 10]);
    assert_eq!(steps, 20);
}

#[test]
fn line_moves_end_on_commanded_position() {
    // duration = distance / speed, as a planner computes it
    let map = LinearCoordMap::new([(AxisCoordinate::X, 80.0)]);
    for tenths in 1..=100u16 {
        let distance = f32::from(tenths) * 0.1;
        let expected = 8 * i32::from(tenths);
        for k in 1..=40u16 {
            let speed = f32::from(k) * 0.7;
            for sign in [1.0, -1.0] {
                let mut set = AxisSet::<1>::unbounded();
                set.init_line(
                    false,
                    &map,
                    &[0],
                    &LinePath::new(Vector4::new(sign * speed, 0.0, 0.0, 0.0), distance / speed),
                );
                while let Some(step) = set.next_step() {
                    set.advance_indexed(step.axis, false);
                }
                assert_eq!(
                    set.positions()[0],
                    sign as i32 * expected,
                    "{} mm at {} mm/s",
                    sign * distance,
                    speed
                );
            }
        }
    }
}

// =============================================================================
// Scheduler interaction
// =============================================================================

#[test]
fn scheduler_backpressure_is_propagated() {
    let mut set = AxisSet::<2>::unbounded();
    set.init_line(
        false,
        &xy_map(),
        &[0, 0],
        &LinePath::new(Vector4::new(1.0, 1.0, 0.0, 0.0), 4.0),
    );

    let mut sched = BufferedScheduler::<6>::new();
    let mut exec = MoveExecutor::new(set, Duration::ZERO, false);

    let err = exec.run_to_completion(&drivers(), &mut sched).unwrap_err();
    assert_eq!(err, Error::Schedule(ScheduleError::QueueFull));
    assert_eq!(exec.steps(), 2);
    assert_eq!(exec.axes().positions(), [1, 1]);

    // Drain and resume: the held-back step is emitted first.
    sched.clear();
    let step = exec.step(&drivers(), &mut sched).unwrap().unwrap();
    assert_eq!(step.axis, 0);
    assert_eq!(step.time, Duration::from_secs(2));
}

#[test]
fn late_steps_are_moved_to_feasible_time() {
    let mut set = AxisSet::<2>::unbounded();
    set.init_line(
        false,
        &xy_map(),
        &[0, 0],
        &LinePath::new(Vector4::new(1.0, 0.0, 0.0, 0.0), 3.0),
    );

    let mut sched = BufferedScheduler::<16>::with_latency(Duration::from_millis(100));
    sched.set_now(Duration::from_millis(1500));
    assert_eq!(sched.sched_time(Duration::from_secs(1)), Duration::from_millis(1600));

    let mut exec = MoveExecutor::new(set, Duration::ZERO, false);
    let first = exec.step(&drivers(), &mut sched).unwrap().unwrap();
    let second = exec.step(&drivers(), &mut sched).unwrap().unwrap();

    assert_eq!(first.time, Duration::from_millis(1600));
    assert_eq!(second.time, Duration::from_secs(2));
}

#[test]
fn step_events_follow_driver_order() {
    let mut set = AxisSet::<2>::unbounded();
    set.init_line(
        false,
        &xy_map(),
        &[0, 0],
        &LinePath::new(Vector4::new(0.0, -1.0, 0.0, 0.0), 1.0),
    );

    let mut sched = BufferedScheduler::<8>::new();
    MoveExecutor::new(set, Duration::from_secs(5), false)
        .run_to_completion(&drivers(), &mut sched)
        .unwrap();

    let events: Vec<_> = sched.events().copied().collect();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].pin(), PinId(21));
    assert_eq!(events[0].state(), PinState::Low);
    assert_eq!(events[0].time(), Duration::from_secs(6));
    assert_eq!(events[1].pin(), PinId(20));
    assert_eq!(events[1].state(), PinState::High);
    assert_eq!(events[2].state(), PinState::Low);
    assert_eq!(events[2].time(), Duration::from_secs(6) + Duration::from_micros(2));
}
