//! Endstop travel configuration and step-space limits.

use serde::Deserialize;

use super::units::{Millimeters, Steps};

/// Endstop-bounded travel in millimeters (from configuration).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EndstopLimits {
    /// Lowest reachable position in millimeters.
    #[serde(rename = "min_mm")]
    pub min: Millimeters,

    /// Highest reachable position in millimeters.
    #[serde(rename = "max_mm")]
    pub max: Millimeters,
}

impl EndstopLimits {
    /// Create new endstop limits.
    pub fn new(min: Millimeters, max: Millimeters) -> Self {
        Self { min, max }
    }

    /// Check if limits are valid (min < max).
    pub fn is_valid(&self) -> bool {
        self.min.0 < self.max.0
    }

    /// Check if a position is within travel.
    pub fn contains(&self, position: Millimeters) -> bool {
        position.0 >= self.min.0 && position.0 <= self.max.0
    }
}

/// Endstop travel converted to steps (for runtime use by steppers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepLimits {
    /// Minimum position in steps.
    pub min_steps: i32,
    /// Maximum position in steps.
    pub max_steps: i32,
}

impl StepLimits {
    /// Create step limits directly.
    pub const fn new(min_steps: i32, max_steps: i32) -> Self {
        Self { min_steps, max_steps }
    }

    /// Create step limits from endstop travel and steps per mm.
    pub fn from_endstops(endstops: &EndstopLimits, steps_per_mm: f32) -> Self {
        Self {
            min_steps: Steps::from_millimeters(endstops.min, steps_per_mm).0,
            max_steps: Steps::from_millimeters(endstops.max, steps_per_mm).0,
        }
    }

    /// Check if a position is within limits.
    #[inline]
    pub fn contains(&self, steps: i32) -> bool {
        steps >= self.min_steps && steps <= self.max_steps
    }
}
