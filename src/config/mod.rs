//! Configuration module for axis-stepper.
//!
//! Provides types for loading and validating machine configurations
//! from TOML files (with `std` feature) or pre-parsed data.

mod axis;
mod limits;
mod machine;
mod timing;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::{AxisConfig, AxisCoordinate};
pub use limits::{EndstopLimits, StepLimits};
pub use machine::{MachineConfig, MAX_AXES};
pub use timing::TimingConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Microsteps, Millimeters, Steps};
