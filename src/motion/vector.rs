//! Small fixed-size vectors for Cartesian velocities and arc geometry.

use core::ops::{Add, Mul, Sub};

/// A point or direction in Cartesian XYZ space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vector3 {
    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean length.
    #[inline]
    pub fn norm(self) -> f32 {
        libm::sqrtf(self.dot(self))
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// A Cartesian XYZ vector plus an extruder component.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector4 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// Extruder component.
    pub e: f32,
}

impl Vector4 {
    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, e: f32) -> Self {
        Self { x, y, z, e }
    }

    /// The XYZ part.
    #[inline]
    pub fn xyz(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Weighted sum of the components, `w = [wx, wy, wz, we]`.
    ///
    /// Components with zero weight are skipped, so a non-finite value in a
    /// coordinate the weights ignore does not leak into the result.
    #[inline]
    pub fn weighted(self, w: [f32; 4]) -> f32 {
        [self.x, self.y, self.z, self.e]
            .into_iter()
            .zip(w)
            .filter(|&(_, wi)| wi != 0.0)
            .fold(0.0, |acc, (c, wi)| acc + c * wi)
    }
}

impl Mul<f32> for Vector4 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.e * rhs)
    }
}
