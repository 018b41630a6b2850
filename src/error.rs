//! Error types for axis-stepper.
//!
//! Numeric trouble inside a move (NaN velocities, zero-radius arcs) never
//! reaches these types: it is absorbed by the affected axis going terminal.
//! What remains is configuration problems, scheduler failures, and bad
//! move requests at the machine facade.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all axis-stepper operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Hardware scheduler rejected an event or request
    Schedule(ScheduleError),
    /// Move request error
    Motion(MotionError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Axis name not found in configuration
    AxisNotFound(heapless::String<32>),
    /// Duplicate axis name in configuration
    DuplicateAxisName(heapless::String<32>),
    /// A pin number is used by more than one step/dir output
    DuplicatePin(u8),
    /// Travel per revolution must be finite and > 0
    InvalidUnitsPerRevolution(f32),
    /// Full steps per revolution must be > 0
    InvalidStepsPerRevolution(u16),
    /// Invalid endstop travel (min must be < max)
    InvalidEndstopLimits {
        /// Minimum travel in millimeters
        min: f32,
        /// Maximum travel in millimeters
        max: f32,
    },
    /// Step pulse width must be > 0
    InvalidPulseWidth,
    /// No axes configured
    NoAxes,
    /// Configured axis count does not match the machine's compile-time axis count
    AxisCountMismatch {
        /// Axis count the machine was built for
        expected: usize,
        /// Axis count found in configuration
        found: usize,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Hardware scheduler errors.
///
/// These are surfaced to the caller unchanged; retrying, stalling or
/// aborting the move is the caller's decision.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// Event queue is full
    QueueFull,
    /// Event targets a pin the scheduler does not drive
    UnknownPin(u8),
    /// The scheduler cannot produce a duty cycle on this pin
    PwmUnsupported(u8),
    /// Duty ratio outside `[0, 1]`
    InvalidDutyCycle(f32),
    /// Pin operation failed
    PinError,
}

/// Move request errors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Path duration must be finite and non-negative
    InvalidDuration(f32),
    /// The arc does not start at the current position of an axis
    ArcStartMismatch {
        /// Mechanical axis index
        axis: usize,
        /// Axis position at the arc start, in steps
        expected: f32,
        /// Current axis position, in steps
        actual: i32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Schedule(e) => write!(f, "Scheduler error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::AxisNotFound(name) => write!(f, "Axis '{}' not found", name),
            ConfigError::DuplicateAxisName(name) => write!(f, "Duplicate axis name: '{}'", name),
            ConfigError::DuplicatePin(pin) => write!(f, "Pin {} is assigned more than once", pin),
            ConfigError::InvalidUnitsPerRevolution(v) => {
                write!(f, "Invalid units per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid full steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidEndstopLimits { min, max } => {
                write!(f, "Invalid endstop limits: min ({}) must be < max ({})", min, max)
            }
            ConfigError::InvalidPulseWidth => write!(f, "Step pulse width must be > 0"),
            ConfigError::NoAxes => write!(f, "No axes configured"),
            ConfigError::AxisCountMismatch { expected, found } => {
                write!(f, "Expected {} axes, configuration has {}", expected, found)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::QueueFull => write!(f, "Event queue is full"),
            ScheduleError::UnknownPin(pin) => write!(f, "Pin {} is not driven by this scheduler", pin),
            ScheduleError::PwmUnsupported(pin) => write!(f, "PWM is not supported on pin {}", pin),
            ScheduleError::InvalidDutyCycle(ratio) => {
                write!(f, "Invalid duty cycle {}. Must be within [0, 1]", ratio)
            }
            ScheduleError::PinError => write!(f, "GPIO pin operation failed"),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::InvalidDuration(d) => {
                write!(f, "Invalid path duration {}. Must be finite and >= 0", d)
            }
            MotionError::ArcStartMismatch {
                axis,
                expected,
                actual,
            } => write!(
                f,
                "Arc starts at step {} on axis {}, but the axis is at {}",
                expected, axis, actual
            ),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<ScheduleError> for Error {
    fn from(e: ScheduleError) -> Self {
        Error::Schedule(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for ScheduleError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}
