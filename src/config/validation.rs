//! Configuration validation.

use heapless::Vec;

use crate::error::{ConfigError, Error, Result};

use super::machine::MAX_AXES;
use super::{AxisConfig, MachineConfig};

/// Validate a machine configuration.
///
/// Checks:
/// - At least one axis is configured
/// - Axis names are unique
/// - No pin is used twice across all step/dir outputs
/// - Steps per revolution and travel per revolution are positive
/// - Endstop travel is valid (min < max)
/// - Step pulse width is non-zero
pub fn validate_config(config: &MachineConfig) -> Result<()> {
    if config.axes.is_empty() {
        return Err(Error::Config(ConfigError::NoAxes));
    }

    if config.timing.pulse_width_ns == 0 {
        return Err(Error::Config(ConfigError::InvalidPulseWidth));
    }

    let mut pins: Vec<u8, { 2 * MAX_AXES }> = Vec::new();
    for (i, axis) in config.axes.iter().enumerate() {
        validate_axis(axis)?;

        if config.axes[..i].iter().any(|other| other.name == axis.name) {
            return Err(Error::Config(ConfigError::DuplicateAxisName(axis.name.clone())));
        }

        for pin in [axis.step_pin, axis.dir_pin] {
            if pins.contains(&pin) {
                return Err(Error::Config(ConfigError::DuplicatePin(pin)));
            }
            // Capacity is 2 * MAX_AXES, and axes is bounded by MAX_AXES
            let _ = pins.push(pin);
        }
    }

    Ok(())
}

fn validate_axis(axis: &AxisConfig) -> Result<()> {
    if axis.full_steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            axis.full_steps_per_revolution,
        )));
    }

    if !(axis.units_per_revolution.is_finite() && axis.units_per_revolution > 0.0) {
        return Err(Error::Config(ConfigError::InvalidUnitsPerRevolution(
            axis.units_per_revolution,
        )));
    }

    if let Some(ref endstops) = axis.endstops {
        if !endstops.is_valid() {
            return Err(Error::Config(ConfigError::InvalidEndstopLimits {
                min: endstops.min.0,
                max: endstops.max.0,
            }));
        }
    }

    Ok(())
}
