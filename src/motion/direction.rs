//! Step direction.

/// Direction of a single mechanical step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepDirection {
    /// Toward lower mechanical positions.
    Backward,
    /// Toward higher mechanical positions.
    Forward,
}

impl StepDirection {
    /// Direction from the sign of a rate. Zero counts as forward.
    #[inline]
    pub fn from_sign(value: f32) -> Self {
        if value < 0.0 {
            StepDirection::Backward
        } else {
            StepDirection::Forward
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            StepDirection::Backward => -1,
            StepDirection::Forward => 1,
        }
    }

    /// Get the opposite direction.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            StepDirection::Backward => StepDirection::Forward,
            StepDirection::Forward => StepDirection::Backward,
        }
    }
}
