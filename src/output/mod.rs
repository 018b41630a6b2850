//! From steps to pin transitions.
//!
//! A [`StepDriver`] turns one step into an ordered sequence of
//! [`OutputEvent`]s; a [`HardwareScheduler`] emits them at their times.

mod buffered;
mod driver;
mod event;
mod pin;
mod scheduler;

pub use buffered::{BufferedScheduler, PwmRequest, MAX_PWM_PINS};
pub use driver::{StepDirDriver, StepDriver};
pub use event::{OutputEvent, PinId};
pub use pin::PinScheduler;
pub use scheduler::HardwareScheduler;
