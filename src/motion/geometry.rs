//! Per-axis trajectories in mechanical step units, and their step solvers.
//!
//! A [`CoordMap`](crate::kinematics::CoordMap) turns a Cartesian path into
//! one of these per axis. Each solver answers a single question: given the
//! axis's integer position `P` and the time of its previous step, when does
//! the continuous trajectory next reach `P + 1` or `P - 1`?
//!
//! Solvers return `None` for anything that cannot produce a real step:
//! non-finite parameters, zero velocity, a zero-amplitude arc, an
//! unreachable target, or a target the axis does not reach by the end of its
//! duration.
//!
//! The end of a move is decided by position, not by comparing step times
//! against the duration: the last step is the one whose target the
//! trajectory reaches at `t = duration`, within [`END_TOLERANCE`] steps. Its
//! time is clamped to the duration.

use core::f32::consts::TAU;

use libm::{acosf, ceilf, cosf, fabsf, floorf};

use super::direction::StepDirection;

/// Step time handed out when an axis already lies past its first target.
const EARLIEST_STEP: f32 = 1.0e-9;

/// How far short of a step target, in steps, the end of a move may fall and
/// still take that step. Grows with the magnitude of the end position.
pub const END_TOLERANCE: f32 = 1.0e-3;

/// The time and direction of one step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepCrossing {
    /// Seconds since the start of the move.
    pub time: f32,
    /// Direction of the step.
    pub direction: StepDirection,
}

/// Straight-line trajectory: `start + velocity * t` steps.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineMotion {
    /// Continuous mechanical position at `t = 0`.
    pub start: f32,
    /// Steps per second.
    pub velocity: f32,
    /// Seconds after which the axis produces no more steps. May be infinite.
    pub duration: f32,
}

impl LineMotion {
    /// Create a line trajectory.
    #[inline]
    pub const fn new(start: f32, velocity: f32, duration: f32) -> Self {
        Self {
            start,
            velocity,
            duration,
        }
    }

    /// An axis that does not move.
    #[inline]
    pub const fn still(start: f32) -> Self {
        Self::new(start, 0.0, 0.0)
    }

    /// Continuous position at time `t`.
    #[inline]
    pub fn position_at(&self, t: f32) -> f32 {
        self.start + self.velocity * t
    }

    /// The step after reaching integer position `position`.
    pub fn next_crossing(&self, position: i32) -> Option<StepCrossing> {
        if !(self.start.is_finite() && self.velocity.is_finite()) || self.velocity == 0.0 {
            return None;
        }

        let direction = StepDirection::from_sign(self.velocity);
        let target = position.saturating_add(direction.sign()) as f32;
        if !reaches(self.position_at(self.duration), target, direction) {
            return None;
        }

        let time = ((target - self.start) / self.velocity).max(EARLIEST_STEP);
        valid(time.min(self.duration)).map(|time| StepCrossing { time, direction })
    }
}

/// Sinusoidal trajectory of an axis lying in an arc's plane:
/// `offset + amplitude * cos(angular_velocity * t - phase)` steps.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CircularMotion {
    /// Mechanical position of the arc center.
    pub offset: f32,
    /// Peak excursion from `offset`, in steps.
    pub amplitude: f32,
    /// Angle (radians) at which the axis is at `offset + amplitude`.
    pub phase: f32,
    /// Radians per second; the sign gives the sense of rotation.
    pub angular_velocity: f32,
    /// Seconds after which the axis produces no more steps. May be infinite.
    pub duration: f32,
}

impl CircularMotion {
    /// Continuous position at time `t`.
    #[inline]
    pub fn position_at(&self, t: f32) -> f32 {
        self.offset + self.amplitude * cosf(self.angular_velocity * t - self.phase)
    }

    /// The first step strictly after `after`, starting from integer position `position`.
    pub fn next_crossing(&self, position: i32, after: f32) -> Option<StepCrossing> {
        let finite = self.offset.is_finite()
            && self.amplitude.is_finite()
            && self.phase.is_finite()
            && self.angular_velocity.is_finite();
        if !finite || self.amplitude == 0.0 || self.angular_velocity == 0.0 {
            return None;
        }

        let forward = self.accept(position.saturating_add(1) as f32, after);
        let backward = self.accept(position.saturating_sub(1) as f32, after);

        let crossing = match (forward, backward) {
            (Some(f), Some(b)) if b < f => StepCrossing {
                time: b,
                direction: StepDirection::Backward,
            },
            (Some(f), _) => StepCrossing {
                time: f,
                direction: StepDirection::Forward,
            },
            (None, Some(b)) => StepCrossing {
                time: b,
                direction: StepDirection::Backward,
            },
            (None, None) => return None,
        };

        valid(crossing.time).map(|time| StepCrossing { time, ..crossing })
    }

    /// Time the axis reaches `target` after `after`, if that happens by the
    /// end of the move. Crossings that rounding puts just past the duration
    /// are kept when the axis stands on `target` at the end.
    fn accept(&self, target: f32, after: f32) -> Option<f32> {
        let time = self.time_to_reach(target, after)?;
        if time <= self.duration {
            return Some(time);
        }

        let end = self.position_at(self.duration);
        if fabsf(end - target) <= tolerance(end) {
            Some(self.duration)
        } else {
            None
        }
    }

    fn time_to_reach(&self, target: f32, after: f32) -> Option<f32> {
        let c = (target - self.offset) / self.amplitude;
        if !(-1.0..=1.0).contains(&c) {
            return None;
        }

        let half = acosf(c);
        let a = self.next_time_at_angle(self.phase + half, after);
        let b = self.next_time_at_angle(self.phase - half, after);
        Some(a.min(b))
    }

    /// Smallest `t > after` with `angular_velocity * t == angle (mod 2π)`.
    fn next_time_at_angle(&self, angle: f32, after: f32) -> f32 {
        let w = self.angular_velocity;
        let turns = (w * after - angle) / TAU;
        let n = if w > 0.0 {
            floorf(turns) + 1.0
        } else {
            ceilf(turns) - 1.0
        };
        (angle + TAU * n) / w
    }
}

/// Trajectory of one axis during an arc move.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArcMotion {
    /// The axis follows the circle.
    Circular(CircularMotion),
    /// The axis is independent of the arc plane (extruder) and moves linearly.
    Linear(LineMotion),
}

impl ArcMotion {
    /// The first step strictly after `after`, starting from integer position `position`.
    pub fn next_crossing(&self, position: i32, after: f32) -> Option<StepCrossing> {
        match self {
            ArcMotion::Circular(c) => c.next_crossing(position, after),
            ArcMotion::Linear(l) => l.next_crossing(position),
        }
    }
}

#[inline]
fn valid(time: f32) -> Option<f32> {
    if time.is_finite() && time > 0.0 {
        Some(time)
    } else {
        None
    }
}

#[inline]
fn tolerance(end: f32) -> f32 {
    END_TOLERANCE.max(fabsf(end) * 8.0 * f32::EPSILON)
}

/// Whether a trajectory ending at `end` gets as far as `target` in `direction`.
#[inline]
fn reaches(end: f32, target: f32, direction: StepDirection) -> bool {
    (end - target) * direction.sign() as f32 >= -tolerance(end)
}
