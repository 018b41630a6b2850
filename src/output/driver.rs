//! Stepper drivers: turning one step into pin events.

use core::time::Duration;

use embedded_hal::digital::PinState;

use crate::config::{AxisConfig, TimingConfig};
use crate::motion::StepDirection;

use super::event::{OutputEvent, PinId};

/// Produces the pin events that realize one step.
///
/// Events come out in emission order, each at or after `time`. The same
/// `time` and `direction` must give the same sequence: when a scheduler
/// rejects part of a step, the executor asks again and queues only the
/// events past those already accepted.
pub trait StepDriver {
    /// The event sequence for one step.
    type Sequence: IntoIterator<Item = OutputEvent>;

    /// Events for a step in `direction` starting at absolute `time`.
    fn step_events(&self, time: Duration, direction: StepDirection) -> Self::Sequence;
}

/// A STEP/DIR driver (A4988, DRV8825, TMC in standalone mode).
///
/// A step sets DIR at `time`, raises STEP after the DIR setup time, and
/// lowers it again one pulse width later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDirDriver {
    step_pin: PinId,
    dir_pin: PinId,
    invert_direction: bool,
    dir_setup: Duration,
    pulse_width: Duration,
}

impl StepDirDriver {
    /// Create a driver.
    pub const fn new(
        step_pin: PinId,
        dir_pin: PinId,
        invert_direction: bool,
        dir_setup: Duration,
        pulse_width: Duration,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            invert_direction,
            dir_setup,
            pulse_width,
        }
    }

    /// Create a driver from axis and timing configuration.
    pub fn from_config(axis: &AxisConfig, timing: &TimingConfig) -> Self {
        Self::new(
            PinId(axis.step_pin),
            PinId(axis.dir_pin),
            axis.invert_direction,
            timing.dir_setup(),
            timing.pulse_width(),
        )
    }

    /// STEP pin.
    #[inline]
    pub fn step_pin(&self) -> PinId {
        self.step_pin
    }

    /// DIR pin.
    #[inline]
    pub fn dir_pin(&self) -> PinId {
        self.dir_pin
    }

    /// DIR level for a direction.
    #[inline]
    pub fn dir_level(&self, direction: StepDirection) -> PinState {
        let forward = direction == StepDirection::Forward;
        PinState::from(forward != self.invert_direction)
    }
}

impl StepDriver for StepDirDriver {
    type Sequence = [OutputEvent; 3];

    fn step_events(&self, time: Duration, direction: StepDirection) -> Self::Sequence {
        let rise = time + self.dir_setup;
        [
            OutputEvent::new(self.dir_pin, self.dir_level(direction), time),
            OutputEvent::new(self.step_pin, PinState::High, rise),
            OutputEvent::new(self.step_pin, PinState::Low, rise + self.pulse_width),
        ]
    }
}

impl<D: StepDriver> StepDriver for &D {
    type Sequence = D::Sequence;

    fn step_events(&self, time: Duration, direction: StepDirection) -> Self::Sequence {
        (*self).step_events(time, direction)
    }
}
