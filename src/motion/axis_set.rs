//! Fixed-size set of axis steppers and the next-step selection rule.

use crate::config::StepLimits;
use crate::kinematics::{ArcPath, CoordMap, LinePath};

use super::direction::StepDirection;
use super::stepper::AxisStepper;

/// Whether a step at `first` should fire before a step at `second`.
///
/// Non-positive times mean "no step" and always lose. Among real times
/// the smaller wins and ties go to `first`. NaN never wins against a real
/// time, in either argument position: `first <= NaN` is false, so a NaN
/// `second` is rejected explicitly, and a NaN `first` loses the `<=`.
#[inline]
pub fn first_fires_sooner(first: f32, second: f32) -> bool {
    if first <= 0.0 {
        return false;
    }
    if second <= 0.0 {
        return true;
    }
    first <= second || second.is_nan()
}

/// The step selected to fire next.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingStep {
    /// Mechanical axis index.
    pub axis: usize,
    /// Seconds since the start of the move.
    pub time: f32,
    /// Direction of the step.
    pub direction: StepDirection,
}

/// One [`AxisStepper`] per mechanical axis, created for a single move.
///
/// Stepper `i` always has index `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSet<const N: usize> {
    axes: [AxisStepper; N],
}

impl<const N: usize> AxisSet<N> {
    /// Create a set with optional endstop travel per axis.
    ///
    /// # Panics
    ///
    /// If `N == 0`.
    pub fn new(limits: [Option<StepLimits>; N]) -> Self {
        assert!(N > 0, "an axis set needs at least one axis");
        Self {
            axes: core::array::from_fn(|i| AxisStepper::new(i, limits[i])),
        }
    }

    /// Create a set with no endstop travel on any axis.
    pub fn unbounded() -> Self {
        Self::new([None; N])
    }

    /// Start a straight-line move on every axis and compute each first step.
    pub fn init_line<M: CoordMap<N>>(
        &mut self,
        use_endstops: bool,
        map: &M,
        position: &[i32; N],
        path: &LinePath,
    ) {
        for stepper in self.axes.iter_mut() {
            stepper.begin_line(map, position, path);
            stepper.advance(use_endstops);
        }
    }

    /// Start an arc move on every axis and compute each first step.
    pub fn init_arc<M: CoordMap<N>>(
        &mut self,
        use_endstops: bool,
        map: &M,
        position: &[i32; N],
        path: &ArcPath,
    ) {
        for stepper in self.axes.iter_mut() {
            stepper.begin_arc(map, position, path);
            stepper.advance(use_endstops);
        }
    }

    /// The stepper whose pending step fires first.
    ///
    /// Scans left to right with [`first_fires_sooner`], so ties resolve to
    /// the lowest index. If no axis has a step pending the returned
    /// stepper's time is not positive; check [`AxisStepper::is_pending`].
    pub fn select_next(&self) -> &AxisStepper {
        let mut best = &self.axes[0];
        for candidate in &self.axes[1..] {
            if !first_fires_sooner(best.time(), candidate.time()) {
                best = candidate;
            }
        }
        best
    }

    /// The next step to fire, or `None` once the move is complete.
    pub fn next_step(&self) -> Option<PendingStep> {
        let s = self.select_next();
        s.is_pending().then(|| PendingStep {
            axis: s.index(),
            time: s.time(),
            direction: s.direction(),
        })
    }

    /// Whether no axis has a step pending.
    #[inline]
    pub fn is_complete(&self) -> bool {
        !self.select_next().is_pending()
    }

    /// Advance exactly the axis with index `axis`, leaving all others untouched.
    ///
    /// # Panics
    ///
    /// If no stepper has index `axis`.
    pub fn advance_indexed(&mut self, axis: usize, use_endstops: bool) {
        let mut matched = false;
        for stepper in self.axes.iter_mut() {
            if stepper.index() == axis {
                stepper.advance(use_endstops);
                matched = true;
            }
        }
        assert!(matched, "no axis with index {} in a set of {}", axis, N);
    }

    /// All steppers, in index order.
    #[inline]
    pub fn axes(&self) -> &[AxisStepper; N] {
        &self.axes
    }

    /// Committed mechanical position of every axis.
    pub fn positions(&self) -> [i32; N] {
        core::array::from_fn(|i| self.axes[i].position())
    }

    /// Indices of axes stopped at their endstop travel.
    pub fn halted_axes(&self) -> impl Iterator<Item = usize> + '_ {
        self.axes
            .iter()
            .filter(|s| s.halted_by_endstop())
            .map(|s| s.index())
    }
}
