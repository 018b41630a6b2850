//! Kinematics where every motor follows a fixed linear combination of
//! Cartesian coordinates: Cartesian printers, CoreXY, and extruders.

use libm::{atan2f, fabsf, hypotf, roundf};

use crate::config::{AxisCoordinate, MachineConfig};
use crate::error::{ConfigError, Error, Result};
use crate::motion::{ArcMotion, CircularMotion, LineMotion, Vector3, Vector4};

use super::{ArcPath, CoordMap, LinePath};

/// How one motor relates to Cartesian space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisMapping {
    /// Cartesian quantity the motor follows.
    pub coordinate: AxisCoordinate,
    /// Steps per millimeter of that quantity.
    pub steps_per_mm: f32,
}

impl AxisMapping {
    fn planar_weights(&self) -> Vector3 {
        let w = self.coordinate.weights();
        Vector3::new(w[0], w[1], w[2])
    }
}

/// Coordinate map for machines whose motors are linear in Cartesian space.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearCoordMap<const N: usize> {
    axes: [AxisMapping; N],
}

impl<const N: usize> LinearCoordMap<N> {
    /// Build from `(coordinate, steps_per_mm)` pairs in axis order.
    pub fn new(axes: [(AxisCoordinate, f32); N]) -> Self {
        Self {
            axes: axes.map(|(coordinate, steps_per_mm)| AxisMapping {
                coordinate,
                steps_per_mm,
            }),
        }
    }

    /// Build from a machine configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AxisCountMismatch` if the configuration does not
    /// declare exactly `N` axes.
    pub fn from_config(config: &MachineConfig) -> Result<Self> {
        if config.axes.len() != N {
            return Err(Error::Config(ConfigError::AxisCountMismatch {
                expected: N,
                found: config.axes.len(),
            }));
        }

        Ok(Self {
            axes: core::array::from_fn(|i| AxisMapping {
                coordinate: config.axes[i].coordinate,
                steps_per_mm: config.axes[i].steps_per_mm(),
            }),
        })
    }

    /// Mapping of one axis.
    #[inline]
    pub fn mapping(&self, axis: usize) -> AxisMapping {
        self.axes[axis]
    }

    /// Continuous mechanical position of `axis` at a Cartesian point.
    pub fn continuous_position(&self, axis: usize, cartesian: &Vector4) -> f32 {
        let m = self.axes[axis];
        cartesian.weighted(m.coordinate.weights()) * m.steps_per_mm
    }

    /// First in-plane axis whose `position` is more than one step away from
    /// the start of `path` (`center + radius * u`), with that axis's
    /// continuous position at the start.
    ///
    /// Axes outside the arc plane move linearly from wherever they are and
    /// are not checked. Non-finite geometry is left to the step solvers.
    pub fn arc_start_mismatch(&self, position: &[i32; N], path: &ArcPath) -> Option<(usize, f32)> {
        let start = path.center + path.u * path.radius;
        (0..N).find_map(|axis| {
            let m = self.axes[axis];
            let w = m.planar_weights();
            if w == Vector3::default() {
                return None;
            }
            let expected = start.dot(w) * m.steps_per_mm;
            (fabsf(expected - position[axis] as f32) > 1.0).then_some((axis, expected))
        })
    }

    /// Mechanical position of every axis at a Cartesian point, rounded to whole steps.
    pub fn to_mechanical(&self, cartesian: &Vector4) -> [i32; N] {
        core::array::from_fn(|axis| roundf(self.continuous_position(axis, cartesian)) as i32)
    }
}

impl<const N: usize> CoordMap<N> for LinearCoordMap<N> {
    fn begin_line(&self, axis: usize, position: &[i32; N], path: &LinePath) -> LineMotion {
        let m = self.axes[axis];
        let velocity = path.velocity.weighted(m.coordinate.weights()) * m.steps_per_mm;
        LineMotion::new(position[axis] as f32, velocity, path.duration)
    }

    fn begin_arc(&self, axis: usize, position: &[i32; N], path: &ArcPath) -> ArcMotion {
        let m = self.axes[axis];
        let w = m.planar_weights();

        if w == Vector3::default() {
            let velocity =
                path.extrusion_velocity * m.coordinate.weights()[3] * m.steps_per_mm;
            return ArcMotion::Linear(LineMotion::new(
                position[axis] as f32,
                velocity,
                path.duration,
            ));
        }

        // Along this axis the circle projects to
        // c + r * (u cos(wt) + v sin(wt)) = c + r * |(u, v)| * cos(wt - atan2(v, u))
        let cu = path.u.dot(w);
        let cv = path.v.dot(w);
        ArcMotion::Circular(CircularMotion {
            offset: path.center.dot(w) * m.steps_per_mm,
            amplitude: path.radius * hypotf(cu, cv) * m.steps_per_mm,
            phase: atan2f(cv, cu),
            angular_velocity: path.angular_velocity,
            duration: path.duration,
        })
    }
}
