//! The per-move step loop.

use core::time::Duration;

use heapless::Vec;

use crate::config::MAX_AXES;
use crate::error::{Error, Result, ScheduleError};
use crate::output::{HardwareScheduler, StepDriver};

use super::axis_set::{AxisSet, PendingStep};
use super::direction::StepDirection;

/// One step handed to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRecord {
    /// Mechanical axis index.
    pub axis: usize,
    /// Absolute time the step was scheduled at.
    pub time: Duration,
    /// Direction of the step.
    pub direction: StepDirection,
}

/// Outcome of a completed move.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveSummary {
    /// Steps handed to the scheduler.
    pub steps: u32,
    /// Absolute time of the last step, if any.
    pub last_step_time: Option<Duration>,
    /// Axes that stopped at their endstop travel, the first `MAX_AXES` of them.
    pub halted: Vec<usize, MAX_AXES>,
}

/// A step whose events were only partly accepted by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PartialStep {
    axis: usize,
    time: Duration,
    accepted: usize,
}

/// Drives one move: select, emit, advance, until no axis has a step left.
///
/// Step times inside the axis set are seconds from the move start; the
/// executor converts them to absolute scheduler time.
#[derive(Debug, Clone)]
pub struct MoveExecutor<const N: usize> {
    axes: AxisSet<N>,
    start: Duration,
    use_endstops: bool,
    steps: u32,
    last_step_time: Option<Duration>,
    partial: Option<PartialStep>,
}

impl<const N: usize> MoveExecutor<N> {
    /// Wrap an initialized axis set. `start` is the absolute move start.
    pub fn new(axes: AxisSet<N>, start: Duration, use_endstops: bool) -> Self {
        Self {
            axes,
            start,
            use_endstops,
            steps: 0,
            last_step_time: None,
            partial: None,
        }
    }

    /// Whether the move has no steps left.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.axes.is_complete()
    }

    /// The axis set being driven.
    #[inline]
    pub fn axes(&self) -> &AxisSet<N> {
        &self.axes
    }

    /// Give back the axis set.
    pub fn into_axes(self) -> AxisSet<N> {
        self.axes
    }

    /// Steps emitted so far.
    #[inline]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Emit the next step.
    ///
    /// Returns `Ok(None)` once the move is complete. On a scheduler error
    /// the selected axis is not advanced, so the same step is selected
    /// again on the next call. Events already queued for that step stay
    /// queued: the retry keeps the step's scheduled time and queues only
    /// the events the scheduler has not yet accepted.
    pub fn step<D, S>(&mut self, drivers: &[D; N], scheduler: &mut S) -> Result<Option<StepRecord>>
    where
        D: StepDriver,
        S: HardwareScheduler,
    {
        let Some(PendingStep {
            axis,
            time,
            direction,
        }) = self.axes.next_step()
        else {
            return Ok(None);
        };

        let (at, skip) = match self.partial {
            Some(p) if p.axis == axis => (p.time, p.accepted),
            _ => {
                let offset = Duration::try_from_secs_f32(time).unwrap_or(Duration::MAX);
                (scheduler.sched_time(self.start.saturating_add(offset)), 0)
            }
        };

        let mut accepted = skip;
        for event in drivers[axis].step_events(at, direction).into_iter().skip(skip) {
            if let Err(e) = scheduler.queue(event) {
                if e == ScheduleError::QueueFull {
                    warn!("scheduler full, axis {} step held back", axis);
                }
                self.partial = Some(PartialStep {
                    axis,
                    time: at,
                    accepted,
                });
                return Err(Error::Schedule(e));
            }
            accepted += 1;
        }

        self.partial = None;
        self.axes.advance_indexed(axis, self.use_endstops);
        self.steps += 1;
        self.last_step_time = Some(at);

        Ok(Some(StepRecord {
            axis,
            time: at,
            direction,
        }))
    }

    /// Emit steps until the move is complete.
    pub fn run_to_completion<D, S>(&mut self, drivers: &[D; N], scheduler: &mut S) -> Result<MoveSummary>
    where
        D: StepDriver,
        S: HardwareScheduler,
    {
        while self.step(drivers, scheduler)?.is_some() {}
        Ok(self.summary())
    }

    /// Progress so far.
    pub fn summary(&self) -> MoveSummary {
        MoveSummary {
            steps: self.steps,
            last_step_time: self.last_step_time,
            halted: self.axes.halted_axes().take(MAX_AXES).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisCoordinate, StepLimits};
    use crate::kinematics::{LinePath, LinearCoordMap};
    use crate::motion::Vector4;
    use crate::output::{BufferedScheduler, PinId, StepDirDriver};
    use embedded_hal::digital::PinState;

    fn drivers() -> [StepDirDriver; 2] {
        [
            StepDirDriver::new(PinId(1), PinId(2), false, Duration::ZERO, Duration::from_micros(1)),
            StepDirDriver::new(PinId(3), PinId(4), false, Duration::ZERO, Duration::from_micros(1)),
        ]
    }

    fn executor(vx: f32, vy: f32, duration: f32) -> MoveExecutor<2> {
        let map = LinearCoordMap::new([(AxisCoordinate::X, 1.0), (AxisCoordinate::Y, 1.0)]);
        let mut set = AxisSet::unbounded();
        set.init_line(
            false,
            &map,
            &[0, 0],
            &LinePath::new(Vector4::new(vx, vy, 0.0, 0.0), duration),
        );
        MoveExecutor::new(set, Duration::from_secs(10), false)
    }

    #[test]
    fn test_run_emits_every_step_in_order() {
        let mut exec = executor(2.0, 1.0, 2.0);
        let mut sched = BufferedScheduler::<64>::new();

        let mut records: heapless::Vec<StepRecord, 8> = heapless::Vec::new();
        while let Some(record) = exec.step(&drivers(), &mut sched).unwrap() {
            records.push(record).unwrap();
        }

        let axes: heapless::Vec<usize, 8> = records.iter().map(|r| r.axis).collect();
        assert_eq!(axes.as_slice(), &[0, 0, 1, 0, 0, 1]);
        assert!(records.windows(2).all(|w| w[0].time <= w[1].time));
        assert_eq!(records[0].time, Duration::from_millis(10_500));

        assert_eq!(sched.len(), 18);
        assert_eq!(exec.axes().positions(), [4, 2]);

        let summary = exec.run_to_completion(&drivers(), &mut sched).unwrap();
        assert_eq!(summary.steps, 6);
        assert_eq!(summary.last_step_time, Some(Duration::from_secs(12)));
    }

    #[test]
    fn test_queue_full_leaves_axis_unadvanced() {
        let mut exec = executor(1.0, 0.0, 5.0);
        let mut sched = BufferedScheduler::<4>::new();

        let first = exec.step(&drivers(), &mut sched).unwrap().unwrap();
        assert_eq!(first.axis, 0);
        let before = exec.axes().clone();

        let err = exec.step(&drivers(), &mut sched).unwrap_err();
        assert_eq!(err, Error::Schedule(ScheduleError::QueueFull));
        assert_eq!(exec.axes(), &before);
        assert_eq!(exec.steps(), 1);
    }

    #[test]
    fn test_retry_queues_only_remaining_events() {
        let mut exec = executor(1.0, 0.0, 5.0);
        let mut sched = BufferedScheduler::<4>::new();
        exec.step(&drivers(), &mut sched).unwrap().unwrap();

        // DIR of the second step fits, STEP high does not
        assert!(exec.step(&drivers(), &mut sched).is_err());
        assert_eq!(sched.len(), 4);

        // Scheduler time moves past the step; the retry keeps its time
        while sched.len() > 1 {
            sched.pop_due(Duration::from_secs(20)).unwrap();
        }

        let second = exec.step(&drivers(), &mut sched).unwrap().unwrap();
        assert_eq!(second.time, Duration::from_secs(12));
        assert_eq!(exec.steps(), 2);

        let pins: heapless::Vec<(PinId, PinState), 4> =
            sched.events().map(|e| (e.pin(), e.state())).collect();
        assert_eq!(
            pins.as_slice(),
            &[
                (PinId(2), PinState::High),
                (PinId(1), PinState::High),
                (PinId(1), PinState::Low),
            ]
        );
    }

    #[test]
    fn test_summary_lists_at_most_max_axes_halted() {
        const AXES: usize = MAX_AXES + 4;
        let map = LinearCoordMap::new([(AxisCoordinate::X, 1.0); AXES]);
        let mut set = AxisSet::new([Some(StepLimits::new(0, 0)); AXES]);
        set.init_line(
            true,
            &map,
            &[0; AXES],
            &LinePath::new(Vector4::new(1.0, 0.0, 0.0, 0.0), 5.0),
        );

        let driver = StepDirDriver::new(PinId(1), PinId(2), false, Duration::ZERO, Duration::ZERO);
        let drivers = [driver; AXES];
        let mut sched = BufferedScheduler::<8>::new();
        let mut exec = MoveExecutor::new(set, Duration::ZERO, true);

        let summary = exec.run_to_completion(&drivers, &mut sched).unwrap();
        assert_eq!(summary.steps, 0);
        assert_eq!(summary.halted.len(), MAX_AXES);
        assert_eq!(summary.halted[0], 0);
        assert_eq!(exec.axes().halted_axes().count(), AXES);
    }

    #[test]
    fn test_complete_move_returns_none() {
        let mut exec = executor(0.0, 0.0, 5.0);
        let mut sched = BufferedScheduler::<4>::new();

        assert!(exec.is_complete());
        assert_eq!(exec.step(&drivers(), &mut sched).unwrap(), None);
        assert_eq!(exec.summary(), MoveSummary::default());
    }
}
