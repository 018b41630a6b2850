//! Timed pin transitions.

use core::time::Duration;

use embedded_hal::digital::PinState;

/// Hardware pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

/// One pin transition at an absolute time.
///
/// `time` is measured from the scheduler's clock origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputEvent {
    pin: PinId,
    state: PinState,
    time: Duration,
}

impl OutputEvent {
    /// Create an event.
    #[inline]
    pub const fn new(pin: PinId, state: PinState, time: Duration) -> Self {
        Self { pin, state, time }
    }

    /// Target pin.
    #[inline]
    pub fn pin(&self) -> PinId {
        self.pin
    }

    /// Level to drive.
    #[inline]
    pub fn state(&self) -> PinState {
        self.state
    }

    /// When to drive it.
    #[inline]
    pub fn time(&self) -> Duration {
        self.time
    }
}
