//! Coordinate mapping between Cartesian paths and mechanical axes.
//!
//! A [`CoordMap`] is consulted once per axis at the start of every move. It
//! converts the Cartesian path into that axis's trajectory in step units;
//! the steppers never see Cartesian space.

mod linear;

pub use linear::LinearCoordMap;

use crate::motion::{ArcMotion, LineMotion, Vector3, Vector4};

/// A straight-line move at constant Cartesian velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinePath {
    /// Cartesian velocity in mm/s (x, y, z, extruder).
    pub velocity: Vector4,
    /// Move length in seconds.
    pub duration: f32,
}

impl LinePath {
    /// Create a line path.
    pub const fn new(velocity: Vector4, duration: f32) -> Self {
        Self { velocity, duration }
    }
}

/// A circular move in the plane spanned by `u` and `v`.
///
/// The tool is at `center + radius * u` when the move starts and travels
/// toward `center + radius * v` for positive angular velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArcPath {
    /// Arc center in mm.
    pub center: Vector3,
    /// Unit vector from the center to the start point.
    pub u: Vector3,
    /// Unit vector orthogonal to `u`, completing the arc plane.
    pub v: Vector3,
    /// Radius in mm.
    pub radius: f32,
    /// Radians per second.
    pub angular_velocity: f32,
    /// Extruder velocity in mm/s.
    pub extrusion_velocity: f32,
    /// Move length in seconds.
    pub duration: f32,
}

/// Converts Cartesian paths into per-axis trajectories for an `N`-axis machine.
///
/// `position` is the current mechanical position of every axis, so
/// kinematics where one axis depends on several coordinates can use it.
pub trait CoordMap<const N: usize> {
    /// Trajectory of `axis` for a straight-line move.
    fn begin_line(&self, axis: usize, position: &[i32; N], path: &LinePath) -> LineMotion;

    /// Trajectory of `axis` for an arc move.
    fn begin_arc(&self, axis: usize, position: &[i32; N], path: &ArcPath) -> ArcMotion;
}

impl<M: CoordMap<N>, const N: usize> CoordMap<N> for &M {
    fn begin_line(&self, axis: usize, position: &[i32; N], path: &LinePath) -> LineMotion {
        (*self).begin_line(axis, position, path)
    }

    fn begin_arc(&self, axis: usize, position: &[i32; N], path: &ArcPath) -> ArcMotion {
        (*self).begin_arc(axis, position, path)
    }
}
