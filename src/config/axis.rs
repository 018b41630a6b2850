//! Per-axis configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::limits::{EndstopLimits, StepLimits};
use super::units::Microsteps;

/// Which Cartesian quantity a mechanical axis follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum AxisCoordinate {
    /// Cartesian X.
    X,
    /// Cartesian Y.
    Y,
    /// Cartesian Z.
    Z,
    /// Extruder (independent linear axis).
    E,
    /// CoreXY "A" motor, follows X + Y.
    A,
    /// CoreXY "B" motor, follows X - Y.
    B,
}

impl AxisCoordinate {
    /// Weights of (x, y, z, e) that make up this axis's travel.
    pub fn weights(self) -> [f32; 4] {
        match self {
            AxisCoordinate::X => [1.0, 0.0, 0.0, 0.0],
            AxisCoordinate::Y => [0.0, 1.0, 0.0, 0.0],
            AxisCoordinate::Z => [0.0, 0.0, 1.0, 0.0],
            AxisCoordinate::E => [0.0, 0.0, 0.0, 1.0],
            AxisCoordinate::A => [1.0, 1.0, 0.0, 0.0],
            AxisCoordinate::B => [1.0, -1.0, 0.0, 0.0],
        }
    }
}

/// Complete axis configuration from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisConfig {
    /// Axis name (max 32 chars).
    pub name: String<32>,

    /// Cartesian quantity this axis follows.
    pub coordinate: AxisCoordinate,

    /// Full steps per motor revolution (typically 200 for 1.8° motors).
    pub full_steps_per_revolution: u16,

    /// Microstep setting (1, 2, 4, 8, 16, 32, etc.).
    #[serde(default)]
    pub microsteps: Microsteps,

    /// Travel in millimeters per motor revolution (belt pitch × pulley teeth, leadscrew lead).
    pub units_per_revolution: f32,

    /// STEP output pin number.
    pub step_pin: u8,

    /// DIR output pin number.
    pub dir_pin: u8,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,

    /// Optional endstop-bounded travel.
    #[serde(default)]
    pub endstops: Option<EndstopLimits>,
}

impl AxisConfig {
    /// Microsteps per motor revolution.
    pub fn steps_per_revolution(&self) -> u32 {
        self.full_steps_per_revolution as u32 * self.microsteps.value() as u32
    }

    /// Steps per millimeter of travel.
    pub fn steps_per_mm(&self) -> f32 {
        self.steps_per_revolution() as f32 / self.units_per_revolution
    }

    /// Endstop travel converted to steps, if configured.
    pub fn step_limits(&self) -> Option<StepLimits> {
        self.endstops
            .as_ref()
            .map(|e| StepLimits::from_endstops(e, self.steps_per_mm()))
    }
}
