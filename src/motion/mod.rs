//! Step timing for multi-axis moves.
//!
//! Each axis runs an [`AxisStepper`] that knows when its next step is due.
//! An [`AxisSet`] picks the axis that fires first, and a [`MoveExecutor`]
//! turns that into scheduled pin events.

mod axis_set;
mod direction;
mod executor;
mod geometry;
mod stepper;
mod vector;

pub use axis_set::{first_fires_sooner, AxisSet, PendingStep};
pub use direction::StepDirection;
pub use executor::{MoveExecutor, MoveSummary, StepRecord};
pub use geometry::{ArcMotion, CircularMotion, LineMotion, StepCrossing, END_TOLERANCE};
pub use stepper::{AxisPhase, AxisStepper};
pub use vector::{Vector3, Vector4};
