use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use super::Scalar;

/// Planar vector, generic over the scalar so the same geometry runs on `f64` and `Dual`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2<S = f64> {
    pub x: S,
    pub y: S,
}

impl<S> Vec2<S> {
    pub const fn new(x: S, y: S) -> Self {
        Vec2 { x, y }
    }
}

impl Vec2<f64> {
    /// Lift into another scalar type as a constant.
    pub fn lift<S: Scalar>(&self) -> Vec2<S> {
        Vec2::new(S::constant(self.x), S::constant(self.y))
    }

    pub fn distance(&self, other: &Vec2<f64>) -> f64 {
        (*self - *other).norm()
    }
}

impl<S: Scalar> Vec2<S> {
    pub fn norm_squared(&self) -> S {
        self.x.clone() * self.x.clone() + self.y.clone() * self.y.clone()
    }

    pub fn norm(&self) -> S {
        self.norm_squared().sqrt()
    }

    /// z-component of the 3D cross product.
    pub fn cross(&self, other: &Vec2<S>) -> S {
        self.x.clone() * other.y.clone() - self.y.clone() * other.x.clone()
    }

    pub fn scale(self, factor: S) -> Vec2<S> {
        Vec2::new(self.x * factor.clone(), self.y * factor)
    }

    /// Counter-clockwise rotation by `angle` radians.
    pub fn rotate(self, angle: S) -> Vec2<S> {
        let (c, s) = (angle.clone().cos(), angle.sin());
        Vec2::new(
            c.clone() * self.x.clone() - s.clone() * self.y.clone(),
            s * self.x + c * self.y,
        )
    }

    /// Drop derivative information.
    pub fn value(&self) -> Vec2<f64> {
        Vec2::new(self.x.value(), self.y.value())
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<S: Scalar> Add for Vec2<S> {
    type Output = Vec2<S>;

    fn add(self, rhs: Vec2<S>) -> Vec2<S> {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<S: Scalar> Sub for Vec2<S> {
    type Output = Vec2<S>;

    fn sub(self, rhs: Vec2<S>) -> Vec2<S> {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<[f64; 2]> for Vec2<f64> {
    fn from(value: [f64; 2]) -> Self {
        Vec2::new(value[0], value[1])
    }
}

impl From<Vec2<f64>> for [f64; 2] {
    fn from(value: Vec2<f64>) -> Self {
        [value.x, value.y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rotate_quarter_turn_is_counter_clockwise() {
        let v = Vec2::new(5.0, 0.0).rotate(FRAC_PI_2);
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn cross_sign_matches_orientation() {
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(0.0, 1.0);
        assert!(a.cross(&b) > 0.0);
        assert!(b.cross(&a) < 0.0);
    }
}
