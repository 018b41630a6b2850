//! The hardware scheduler contract.

use core::time::Duration;

use crate::error::ScheduleError;

use super::event::{OutputEvent, PinId};

/// Emits timed pin events.
///
/// Implementations may run emission on another context (timer interrupt,
/// DMA channel, thread). Callers queue events in the order they must be
/// emitted and never queue out-of-order times for the same pin.
pub trait HardwareScheduler {
    /// Accept one event for emission at its carried time.
    ///
    /// Must not silently drop the event: either it is accepted (possibly
    /// late) or an error is returned.
    fn queue(&mut self, event: OutputEvent) -> Result<(), ScheduleError>;

    /// Request a sustained duty cycle on `pin`.
    ///
    /// `duty` is in `[0, 1]`; `max_period` bounds the PWM period.
    /// Hardware without PWM returns [`ScheduleError::PwmUnsupported`].
    fn queue_pwm(&mut self, pin: PinId, duty: f32, max_period: Duration)
        -> Result<(), ScheduleError>;

    /// Earliest time at or after `requested` at which an event can still be
    /// scheduled.
    fn sched_time(&self, requested: Duration) -> Duration;
}

impl<S: HardwareScheduler + ?Sized> HardwareScheduler for &mut S {
    #[inline]
    fn queue(&mut self, event: OutputEvent) -> Result<(), ScheduleError> {
        (**self).queue(event)
    }

    #[inline]
    fn queue_pwm(
        &mut self,
        pin: PinId,
        duty: f32,
        max_period: Duration,
    ) -> Result<(), ScheduleError> {
        (**self).queue_pwm(pin, duty, max_period)
    }

    #[inline]
    fn sched_time(&self, requested: Duration) -> Duration {
        (**self).sched_time(requested)
    }
}

/// Check a duty ratio is within `[0, 1]`.
pub(crate) fn check_duty(duty: f32) -> Result<(), ScheduleError> {
    if (0.0..=1.0).contains(&duty) {
        Ok(())
    } else {
        Err(ScheduleError::InvalidDutyCycle(duty))
    }
}
