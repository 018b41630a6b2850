//! # axis-stepper
//!
//! Software step timing for multi-axis machines, with embedded-hal 1.0 output.
//!
//! ## Features
//!
//! - **Per-axis step solvers**: exact step times for straight lines and arcs
//! - **Deterministic selection**: the next step across all axes is chosen with
//!   a documented comparison that ignores finished axes and never picks NaN
//! - **No dynamic dispatch**: axis sets are fixed-size arrays, coordinate maps
//!   and drivers are generic parameters
//! - **Endstop-aware**: axes stop at their configured travel instead of stepping past it
//! - **Configuration-driven**: describe axes, pins and timing in TOML
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use axis_stepper::{BufferedScheduler, LinePath, Machine, Vector4};
//!
//! // Load configuration from TOML
//! let config = axis_stepper::load_config("machine.toml")?;
//! let mut machine = Machine::<3>::from_config(config)?;
//!
//! // Queue step events for a 10 mm move along X at 20 mm/s
//! let mut scheduler = BufferedScheduler::<1024>::new();
//! let summary = machine.line(
//!     &mut scheduler,
//!     &LinePath::new(Vector4::new(20.0, 0.0, 0.0, 0.0), 0.5),
//! )?;
//! ```
//!
//! Lower-level use drives an [`AxisSet`] directly:
//!
//! ```rust,ignore
//! let mut axes = AxisSet::<2>::unbounded();
//! axes.init_line(false, &map, &position, &path);
//! while let Some(step) = axes.next_step() {
//!     emit(step.axis, step.time, step.direction);
//!     axes.advance_indexed(step.axis, false);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Logging macros, must come first
#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod error;
pub mod kinematics;
pub mod machine;
pub mod motion;
pub mod output;

// Re-exports for ergonomic API
pub use config::{validate_config, AxisConfig, AxisCoordinate, MachineConfig, TimingConfig};
pub use error::{Error, Result};
pub use kinematics::{ArcPath, CoordMap, LinePath, LinearCoordMap};
pub use machine::{Machine, MechanicalPosition};
pub use motion::{
    first_fires_sooner, AxisPhase, AxisSet, AxisStepper, MoveExecutor, MoveSummary, StepDirection,
    Vector3, Vector4,
};
pub use output::{
    BufferedScheduler, HardwareScheduler, OutputEvent, PinId, PinScheduler, StepDirDriver,
    StepDriver,
};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Microsteps, Millimeters, Steps};
