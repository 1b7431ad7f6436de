//! 2D vector value type.

use crate::error::{PhysicsError, Result};
use crate::float::Float;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2D vector for planar physics.
///
/// Plain value type: every operation returns a new vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Create a new 2D vector.
    pub fn new(x: F, y: F) -> Self { Vec2 { x, y } }

    /// Zero vector.
    pub fn zero() -> Self { Vec2 { x: F::zero(), y: F::zero() } }

    /// Unit vector along +Y.
    pub fn unit_y() -> Self { Vec2 { x: F::zero(), y: F::one() } }

    /// Dot product.
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (returns scalar): self.x * other.y - self.y * other.x
    pub fn cross(self, other: Self) -> F {
        self.x * other.y - self.y * other.x
    }

    /// Perpendicular vector (rotated 90 degrees counter-clockwise).
    pub fn perp(self) -> Self {
        Vec2 { x: -self.y, y: self.x }
    }

    /// Scale both components by a scalar.
    pub fn scale(self, s: F) -> Self {
        Vec2 { x: self.x * s, y: self.y * s }
    }

    /// Squared length (avoids sqrt).
    pub fn length_sq(self) -> F {
        self.dot(self)
    }

    /// Length (magnitude).
    pub fn length(self) -> F {
        self.length_sq().sqrt()
    }

    /// Normalize to unit length.
    ///
    /// Fails with [`PhysicsError::DegenerateVector`] when the length is
    /// below [`Float::epsilon`].
    pub fn normalize(self) -> Result<Self> {
        let len = self.length();
        if len.is_near_zero(F::epsilon()) {
            Err(PhysicsError::DegenerateVector)
        } else {
            Ok(self.scale(F::one() / len))
        }
    }

    /// Normalize to unit length, or return the zero vector if the length is
    /// near zero.
    pub fn normalize_or_zero(self) -> Self {
        self.normalize().unwrap_or_else(|_| Self::zero())
    }

    /// Distance between two points.
    pub fn distance(self, other: Self) -> F {
        (self - other).length()
    }

    /// Squared distance between two points.
    pub fn distance_sq(self, other: Self) -> F {
        (self - other).length_sq()
    }

    /// Linear interpolation between self and other.
    pub fn lerp(self, other: Self, t: F) -> Self {
        self + (other - self).scale(t)
    }

    /// Both components finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Vec2 { x: self.x + rhs.x, y: self.y + rhs.y } }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { Vec2 { x: self.x - rhs.x, y: self.y - rhs.y } }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;
    fn neg(self) -> Self { Vec2 { x: -self.x, y: -self.y } }
}

impl<F: Float> Mul<F> for Vec2<F> {
    type Output = Self;
    fn mul(self, rhs: F) -> Self { self.scale(rhs) }
}

impl<F: Float> Div<F> for Vec2<F> {
    type Output = Self;
    fn div(self, rhs: F) -> Self { Vec2 { x: self.x / rhs, y: self.y / rhs } }
}

impl<F: Float> AddAssign for Vec2<F> {
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl<F: Float> SubAssign for Vec2<F> {
    fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_length() {
        let v = Vec2::new(3.0f64, 4.0);
        assert!((v.length() - 5.0).abs() < 1e-12);
        assert!((v.length_sq() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn arithmetic() {
        let a = Vec2::new(1.0f64, 2.0);
        let b = Vec2::new(3.0f64, -1.0);
        assert_eq!(a + b, Vec2::new(4.0, 1.0));
        assert_eq!(a - b, Vec2::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
        assert!((a.dot(b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_unit_length() {
        let n = Vec2::new(0.0f64, -7.5).normalize().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert_eq!(n, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn normalize_zero_vector_fails() {
        let v = Vec2::<f64>::zero();
        assert_eq!(v.normalize(), Err(PhysicsError::DegenerateVector));
        assert_eq!(v.normalize_or_zero(), Vec2::zero());
    }

    #[test]
    fn lerp_midpoint() {
        let a = Vec2::new(0.0f32, 0.0);
        let b = Vec2::new(10.0f32, 10.0);
        let mid = a.lerp(b, 0.5);
        assert!((mid.x - 5.0).abs() < 1e-6);
        assert!((mid.y - 5.0).abs() < 1e-6);
    }

    #[test]
    fn distance_calculation() {
        let a = Vec2::new(0.0f32, 0.0);
        let b = Vec2::new(3.0f32, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
    }
}
