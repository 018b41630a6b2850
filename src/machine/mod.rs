//! Machine facade built from configuration.

mod facade;
mod position;

pub use facade::Machine;
pub use position::MechanicalPosition;
