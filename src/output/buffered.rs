//! A bounded in-memory event queue.
//!
//! Useful as the hand-off point to an interrupt or DMA emitter, and for
//! simulation: events wait in a fixed-capacity deque until the emitter
//! drains them with [`BufferedScheduler::pop_due`].

use core::time::Duration;

use heapless::{Deque, Vec};

use crate::error::ScheduleError;

use super::event::{OutputEvent, PinId};
use super::scheduler::{check_duty, HardwareScheduler};

/// Maximum number of pins with an active PWM request.
pub const MAX_PWM_PINS: usize = 8;

/// A sustained duty-cycle request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PwmRequest {
    /// Target pin.
    pub pin: PinId,
    /// Duty ratio in `[0, 1]`.
    pub duty: f32,
    /// Longest acceptable period.
    pub max_period: Duration,
}

/// Fixed-capacity event queue with a software clock.
#[derive(Debug)]
pub struct BufferedScheduler<const CAP: usize> {
    events: Deque<OutputEvent, CAP>,
    pwm: Vec<PwmRequest, MAX_PWM_PINS>,
    now: Duration,
    latency: Duration,
}

impl<const CAP: usize> BufferedScheduler<CAP> {
    /// Create an empty queue whose clock is at zero.
    pub const fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// Create an empty queue that needs `latency` lead time for new events.
    pub const fn with_latency(latency: Duration) -> Self {
        Self {
            events: Deque::new(),
            pwm: Vec::new(),
            now: Duration::ZERO,
            latency,
        }
    }

    /// Current clock.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward. The clock never goes backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Number of queued events.
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Queued events in emission order.
    pub fn events(&self) -> impl Iterator<Item = &OutputEvent> {
        self.events.iter()
    }

    /// Active PWM requests, one per pin.
    pub fn pwm_requests(&self) -> &[PwmRequest] {
        &self.pwm
    }

    /// Advance the clock to `now` and remove the next event due by then.
    pub fn pop_due(&mut self, now: Duration) -> Option<OutputEvent> {
        self.set_now(now);
        match self.events.front() {
            Some(event) if event.time() <= self.now => self.events.pop_front(),
            _ => None,
        }
    }

    /// Remove every queued event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<const CAP: usize> Default for BufferedScheduler<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> HardwareScheduler for BufferedScheduler<CAP> {
    fn queue(&mut self, event: OutputEvent) -> Result<(), ScheduleError> {
        self.events
            .push_back(event)
            .map_err(|_| ScheduleError::QueueFull)
    }

    fn queue_pwm(
        &mut self,
        pin: PinId,
        duty: f32,
        max_period: Duration,
    ) -> Result<(), ScheduleError> {
        check_duty(duty)?;
        let request = PwmRequest {
            pin,
            duty,
            max_period,
        };

        if let Some(existing) = self.pwm.iter_mut().find(|r| r.pin == pin) {
            *existing = request;
            return Ok(());
        }
        self.pwm.push(request).map_err(|_| ScheduleError::QueueFull)
    }

    fn sched_time(&self, requested: Duration) -> Duration {
        requested.max(self.now + self.latency)
    }
}
