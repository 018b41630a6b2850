//! Step pulse timing configuration.

use core::time::Duration;

use serde::Deserialize;

/// Pulse timing shared by all step/dir drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Width of the STEP high pulse in nanoseconds.
    #[serde(default = "default_pulse_width_ns")]
    pub pulse_width_ns: u32,

    /// Delay between setting DIR and raising STEP, in nanoseconds.
    #[serde(default = "default_dir_setup_ns")]
    pub dir_setup_ns: u32,

    /// Halt axes at their endstop travel during moves.
    #[serde(default = "default_use_endstops")]
    pub use_endstops: bool,
}

fn default_pulse_width_ns() -> u32 {
    2_000
}

fn default_dir_setup_ns() -> u32 {
    200
}

fn default_use_endstops() -> bool {
    true
}

impl TimingConfig {
    /// STEP pulse width as a duration.
    #[inline]
    pub fn pulse_width(&self) -> Duration {
        Duration::from_nanos(self.pulse_width_ns as u64)
    }

    /// DIR setup time as a duration.
    #[inline]
    pub fn dir_setup(&self) -> Duration {
        Duration::from_nanos(self.dir_setup_ns as u64)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            pulse_width_ns: default_pulse_width_ns(),
            dir_setup_ns: default_dir_setup_ns(),
            use_endstops: default_use_endstops(),
        }
    }
}
