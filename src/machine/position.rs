//! Mechanical position tracking for every axis of a machine.

use crate::config::units::{Millimeters, Steps};

/// Absolute position of `N` axes in steps, with millimeter conversions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MechanicalPosition<const N: usize> {
    /// Current position of each axis in steps (from origin)
    steps: [i32; N],
    /// Steps per millimeter of each axis
    steps_per_mm: [f32; N],
}

impl<const N: usize> MechanicalPosition<N> {
    /// Create a tracker at the origin.
    #[inline]
    pub fn new(steps_per_mm: [f32; N]) -> Self {
        Self {
            steps: [0; N],
            steps_per_mm,
        }
    }

    /// Position of every axis in steps.
    #[inline]
    pub fn steps(&self) -> &[i32; N] {
        &self.steps
    }

    /// Position of one axis in steps.
    #[inline]
    pub fn axis_steps(&self, axis: usize) -> Steps {
        Steps(self.steps[axis])
    }

    /// Position of one axis in millimeters.
    #[inline]
    pub fn axis_millimeters(&self, axis: usize) -> Millimeters {
        self.axis_steps(axis).to_millimeters(self.steps_per_mm[axis])
    }

    /// Overwrite every axis.
    #[inline]
    pub fn set_steps(&mut self, steps: [i32; N]) {
        self.steps = steps;
    }

    /// Overwrite one axis, in millimeters.
    #[inline]
    pub fn set_axis_millimeters(&mut self, axis: usize, mm: Millimeters) {
        self.steps[axis] = Steps::from_millimeters(mm, self.steps_per_mm[axis]).0;
    }

    /// Set the current position as the origin.
    #[inline]
    pub fn set_origin(&mut self) {
        self.steps = [0; N];
    }

    /// Steps per millimeter of one axis.
    #[inline]
    pub fn steps_per_mm(&self, axis: usize) -> f32 {
        self.steps_per_mm[axis]
    }
}
