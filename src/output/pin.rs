//! Direct emission on embedded-hal pins.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::Vec;

use crate::error::ScheduleError;

use super::event::{OutputEvent, PinId};
use super::scheduler::{check_duty, HardwareScheduler};

/// Scheduler that drives pins synchronously.
///
/// `queue` busy-waits with the delay provider until the event's time, then
/// sets the pin. The clock is the sum of all delays performed so far, so
/// late events fire immediately. There is no PWM capability.
pub struct PinScheduler<P, D, const PINS: usize>
where
    P: OutputPin,
    D: DelayNs,
{
    pins: Vec<(PinId, P), PINS>,
    delay: D,
    now: Duration,
}

impl<P, D, const PINS: usize> PinScheduler<P, D, PINS>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Create a scheduler with no pins.
    pub fn new(delay: D) -> Self {
        Self {
            pins: Vec::new(),
            delay,
            now: Duration::ZERO,
        }
    }

    /// Attach a pin. Replaces any pin already registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::QueueFull` if `PINS` pins are already attached.
    pub fn with_pin(mut self, id: PinId, pin: P) -> core::result::Result<Self, ScheduleError> {
        if let Some(slot) = self.pins.iter_mut().find(|(p, _)| *p == id) {
            slot.1 = pin;
        } else {
            self.pins
                .push((id, pin))
                .map_err(|_| ScheduleError::QueueFull)?;
        }
        Ok(self)
    }

    /// Time elapsed on this scheduler's clock.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Release the pins and delay provider.
    pub fn release(self) -> (Vec<(PinId, P), PINS>, D) {
        (self.pins, self.delay)
    }

    fn wait_until(&mut self, time: Duration) {
        if time <= self.now {
            return;
        }
        let mut remaining = (time - self.now).as_nanos();
        while remaining > 0 {
            let chunk = remaining.min(u32::MAX as u128) as u32;
            self.delay.delay_ns(chunk);
            remaining -= chunk as u128;
        }
        self.now = time;
    }
}

impl<P, D, const PINS: usize> HardwareScheduler for PinScheduler<P, D, PINS>
where
    P: OutputPin,
    D: DelayNs,
{
    fn queue(&mut self, event: OutputEvent) -> Result<(), ScheduleError> {
        let id = event.pin();
        if !self.pins.iter().any(|(p, _)| *p == id) {
            return Err(ScheduleError::UnknownPin(id.0));
        }

        self.wait_until(event.time());

        let pin = self
            .pins
            .iter_mut()
            .find(|(p, _)| *p == id)
            .map(|(_, pin)| pin)
            .ok_or(ScheduleError::UnknownPin(id.0))?;
        pin.set_state(event.state())
            .map_err(|_| ScheduleError::PinError)
    }

    fn queue_pwm(
        &mut self,
        pin: PinId,
        duty: f32,
        _max_period: Duration,
    ) -> Result<(), ScheduleError> {
        check_duty(duty)?;
        Err(ScheduleError::PwmUnsupported(pin.0))
    }

    fn sched_time(&self, requested: Duration) -> Duration {
        requested.max(self.now)
    }
}
