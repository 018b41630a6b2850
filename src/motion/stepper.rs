//! Per-axis step state machine.

use crate::config::StepLimits;
use crate::kinematics::{ArcPath, CoordMap, LinePath};

use super::direction::StepDirection;
use super::geometry::{ArcMotion, LineMotion, StepCrossing};

/// Where an [`AxisStepper`] is in its move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisPhase {
    /// No move has been started.
    Uninitialized,
    /// A trajectory is loaded but the first step has not been computed.
    Primed,
    /// A step is pending at [`AxisStepper::time`].
    Active,
    /// The trajectory produces no further steps.
    Finished,
    /// The next step would have left the axis's endstop travel.
    EndstopHalted,
}

impl AxisPhase {
    /// Whether the axis is done for the rest of the move.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, AxisPhase::Finished | AxisPhase::EndstopHalted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Geometry {
    Line(LineMotion),
    Arc(ArcMotion),
}

impl Geometry {
    #[inline]
    fn next_crossing(&self, position: i32, after: f32) -> Option<StepCrossing> {
        match self {
            Geometry::Line(line) => line.next_crossing(position),
            Geometry::Arc(arc) => arc.next_crossing(position, after),
        }
    }
}

/// Step generator for one mechanical axis over one move.
///
/// The pending step is described by [`time`](Self::time) and
/// [`direction`](Self::direction). A `time` of zero is the terminal
/// sentinel: the axis has nothing more to do this move. Steppers never
/// store NaN; degenerate trajectories resolve to the sentinel instead.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisStepper {
    index: usize,
    time: f32,
    direction: StepDirection,
    position: i32,
    last_step_time: f32,
    geometry: Geometry,
    limits: Option<StepLimits>,
    phase: AxisPhase,
}

impl AxisStepper {
    /// Create a stepper for mechanical axis `index`, optionally bounded by endstop travel.
    pub fn new(index: usize, limits: Option<StepLimits>) -> Self {
        Self {
            index,
            time: 0.0,
            direction: StepDirection::Forward,
            position: 0,
            last_step_time: 0.0,
            geometry: Geometry::Line(LineMotion::still(0.0)),
            limits,
            phase: AxisPhase::Uninitialized,
        }
    }

    /// Mechanical axis index.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Seconds from move start of the pending step, or `<= 0` if none.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Direction of the pending step.
    #[inline]
    pub fn direction(&self) -> StepDirection {
        self.direction
    }

    /// Mechanical position after all committed steps.
    #[inline]
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> AxisPhase {
        self.phase
    }

    /// Endstop travel in steps, if any.
    #[inline]
    pub fn limits(&self) -> Option<StepLimits> {
        self.limits
    }

    /// Whether a real step is pending.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.time > 0.0 && self.time.is_finite()
    }

    /// Whether the axis stopped at its endstop travel.
    #[inline]
    pub fn halted_by_endstop(&self) -> bool {
        self.phase == AxisPhase::EndstopHalted
    }

    /// Load a straight-line trajectory. Call [`advance`](Self::advance) next.
    pub fn begin_line<M, const N: usize>(&mut self, map: &M, position: &[i32; N], path: &LinePath)
    where
        M: CoordMap<N>,
    {
        let motion = map.begin_line(self.index, position, path);
        self.load(Geometry::Line(motion), position[self.index]);
    }

    /// Load an arc trajectory. Call [`advance`](Self::advance) next.
    pub fn begin_arc<M, const N: usize>(&mut self, map: &M, position: &[i32; N], path: &ArcPath)
    where
        M: CoordMap<N>,
    {
        let motion = map.begin_arc(self.index, position, path);
        self.load(Geometry::Arc(motion), position[self.index]);
    }

    fn load(&mut self, geometry: Geometry, position: i32) {
        self.geometry = geometry;
        self.position = position;
        self.time = 0.0;
        self.last_step_time = 0.0;
        self.direction = StepDirection::Forward;
        self.phase = AxisPhase::Primed;
    }

    /// Commit the pending step (if any) and compute the one after it.
    ///
    /// The first call after `begin_*` only computes the first step. Once
    /// terminal, further calls change nothing.
    ///
    /// # Panics
    ///
    /// If no trajectory was loaded with `begin_line`/`begin_arc`.
    pub fn advance(&mut self, use_endstops: bool) {
        match self.phase {
            AxisPhase::Uninitialized => {
                panic!("axis {} advanced before begin_line/begin_arc", self.index)
            }
            AxisPhase::Finished | AxisPhase::EndstopHalted => return,
            AxisPhase::Primed => {}
            AxisPhase::Active => {
                self.position = self.position.saturating_add(self.direction.sign());
                self.last_step_time = self.time;
            }
        }

        let Some(step) = self.geometry.next_crossing(self.position, self.last_step_time) else {
            self.terminate(AxisPhase::Finished);
            return;
        };

        if use_endstops {
            if let Some(limits) = self.limits {
                let landing = self.position.saturating_add(step.direction.sign());
                if !limits.contains(landing) {
                    warn!(
                        "axis {} halted at endstop: step to {} outside [{}, {}]",
                        self.index,
                        landing,
                        limits.min_steps,
                        limits.max_steps
                    );
                    self.terminate(AxisPhase::EndstopHalted);
                    return;
                }
            }
        }

        self.time = step.time;
        self.direction = step.direction;
        self.phase = AxisPhase::Active;
    }

    fn terminate(&mut self, phase: AxisPhase) {
        trace!("axis {} terminal at position {}", self.index, self.position);
        self.time = 0.0;
        self.phase = phase;
    }
}
