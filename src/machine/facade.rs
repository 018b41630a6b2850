//! Machine facade: configuration in, scheduled step events out.

use core::time::Duration;

use heapless::String;

use crate::config::units::Millimeters;
use crate::config::{validate_config, MachineConfig, StepLimits};
use crate::error::{ConfigError, Error, MotionError, Result};
use crate::kinematics::{ArcPath, LinePath, LinearCoordMap};
use crate::motion::{AxisSet, MoveExecutor, MoveSummary, Vector4};
use crate::output::{HardwareScheduler, StepDirDriver};

use super::position::MechanicalPosition;

/// An `N`-axis machine built from a [`MachineConfig`].
///
/// `Machine` owns the coordinate map, one STEP/DIR driver per axis, the
/// endstop travel and the mechanical position. Each call to [`line`] or
/// [`arc`] runs one complete move through a [`HardwareScheduler`]. Moves
/// are placed back to back on the scheduler's clock.
///
/// # Example
///
/// ```rust,ignore
/// use axis_stepper::{Machine, BufferedScheduler, LinePath, Vector4};
///
/// let config = axis_stepper::load_config("machine.toml")?;
/// let mut machine = Machine::<3>::from_config(config)?;
/// let mut scheduler = BufferedScheduler::<1024>::new();
///
/// // 10 mm along X at 20 mm/s
/// machine.line(&mut scheduler, &LinePath::new(Vector4::new(20.0, 0.0, 0.0, 0.0), 0.5))?;
/// ```
///
/// [`line`]: Machine::line
/// [`arc`]: Machine::arc
#[derive(Debug, Clone)]
pub struct Machine<const N: usize> {
    /// The machine configuration.
    config: MachineConfig,
    /// Cartesian to mechanical mapping.
    map: LinearCoordMap<N>,
    /// One driver per axis, in axis order.
    drivers: [StepDirDriver; N],
    /// Endstop travel per axis.
    limits: [Option<StepLimits>; N],
    /// Committed mechanical position.
    position: MechanicalPosition<N>,
    /// Scheduler time at which the next move may start.
    cursor: Duration,
}

impl<const N: usize> Machine<N> {
    /// Build a machine from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if validation fails or the
    /// configuration does not declare exactly `N` axes.
    pub fn from_config(config: MachineConfig) -> Result<Self> {
        validate_config(&config)?;
        let map = LinearCoordMap::from_config(&config)?;

        let axes = &config.axes;
        let drivers = core::array::from_fn(|i| StepDirDriver::from_config(&axes[i], &config.timing));
        let limits = core::array::from_fn(|i| axes[i].step_limits());
        let position = MechanicalPosition::new(core::array::from_fn(|i| axes[i].steps_per_mm()));

        debug!("machine configured with {} axes", N);

        Ok(Self {
            config,
            map,
            drivers,
            limits,
            position,
            cursor: Duration::ZERO,
        })
    }

    /// The machine configuration.
    #[inline]
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Drivers in axis order.
    #[inline]
    pub fn drivers(&self) -> &[StepDirDriver; N] {
        &self.drivers
    }

    /// The coordinate map.
    #[inline]
    pub fn coord_map(&self) -> &LinearCoordMap<N> {
        &self.map
    }

    /// Committed mechanical position.
    #[inline]
    pub fn position(&self) -> &MechanicalPosition<N> {
        &self.position
    }

    /// Scheduler time at which the next move will start at the earliest.
    #[inline]
    pub fn cursor(&self) -> Duration {
        self.cursor
    }

    /// Index of a named axis.
    pub fn axis_index(&self, name: &str) -> Option<usize> {
        self.config.axis_index(name)
    }

    /// Overwrite the mechanical position of every axis.
    pub fn set_position(&mut self, steps: [i32; N]) {
        self.position.set_steps(steps);
    }

    /// Overwrite one named axis's position, in millimeters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AxisNotFound` for an unknown name.
    pub fn set_axis_position(&mut self, name: &str, mm: Millimeters) -> Result<()> {
        let axis = self.axis_index(name).ok_or_else(|| {
            Error::Config(ConfigError::AxisNotFound(
                String::try_from(name).unwrap_or_default(),
            ))
        })?;
        self.position.set_axis_millimeters(axis, mm);
        Ok(())
    }

    /// Set the mechanical position from a Cartesian point in millimeters.
    pub fn set_cartesian_position(&mut self, cartesian: &Vector4) {
        self.position.set_steps(self.map.to_mechanical(cartesian));
    }

    /// Run a straight-line move to completion.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::InvalidDuration` for a negative or non-finite
    /// duration, or the scheduler's error unchanged. After a scheduler
    /// error the position reflects every step queued before it.
    pub fn line<S: HardwareScheduler>(
        &mut self,
        scheduler: &mut S,
        path: &LinePath,
    ) -> Result<MoveSummary> {
        let duration = move_duration(path.duration)?;
        let mut axes = AxisSet::new(self.limits);
        axes.init_line(
            self.config.timing.use_endstops,
            &self.map,
            self.position.steps(),
            path,
        );
        self.run(axes, scheduler, duration)
    }

    /// Run an arc move to completion.
    ///
    /// # Errors
    ///
    /// Same as [`line`](Self::line). Also returns
    /// `MotionError::ArcStartMismatch`, without queueing anything, when an
    /// in-plane axis is more than one step away from the arc start.
    pub fn arc<S: HardwareScheduler>(
        &mut self,
        scheduler: &mut S,
        path: &ArcPath,
    ) -> Result<MoveSummary> {
        let duration = move_duration(path.duration)?;
        if let Some((axis, expected)) = self.map.arc_start_mismatch(self.position.steps(), path) {
            warn!("arc start is off the current position on axis {}", axis);
            return Err(Error::Motion(MotionError::ArcStartMismatch {
                axis,
                expected,
                actual: self.position.steps()[axis],
            }));
        }
        let mut axes = AxisSet::new(self.limits);
        axes.init_arc(
            self.config.timing.use_endstops,
            &self.map,
            self.position.steps(),
            path,
        );
        self.run(axes, scheduler, duration)
    }

    fn run<S: HardwareScheduler>(
        &mut self,
        axes: AxisSet<N>,
        scheduler: &mut S,
        duration: Duration,
    ) -> Result<MoveSummary> {
        let start = scheduler.sched_time(self.cursor);
        debug!("move start at {} us", start.as_micros() as u64);

        let mut executor = MoveExecutor::new(axes, start, self.config.timing.use_endstops);
        let result = executor.run_to_completion(&self.drivers, scheduler);
        self.position.set_steps(executor.axes().positions());

        let summary = result?;
        self.cursor = start.saturating_add(duration);
        debug!(
            "move finished: {} steps, {} axes halted",
            summary.steps,
            summary.halted.len()
        );
        Ok(summary)
    }
}

fn move_duration(seconds: f32) -> Result<Duration> {
    Duration::try_from_secs_f32(seconds)
        .map_err(|_| Error::Motion(MotionError::InvalidDuration(seconds)))
}
