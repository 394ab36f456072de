//! Scalar abstraction shared by the plain and the differentiable evaluator.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Numeric type the kinematic formulas are written against.
///
/// `f64` runs the plain forward pass; [`Dual`](super::Dual) runs the same code while
/// carrying partial derivatives.
pub trait Scalar:
    Clone
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Lift a plain number into the scalar type with no derivative attached.
    fn constant(value: f64) -> Self;

    /// The primal value.
    fn value(&self) -> f64;

    fn sqrt(self) -> Self;
    fn acos(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;

    fn is_finite(&self) -> bool {
        self.value().is_finite()
    }
}

impl Scalar for f64 {
    #[inline]
    fn constant(value: f64) -> Self {
        value
    }

    #[inline]
    fn value(&self) -> f64 {
        *self
    }

    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    #[inline]
    fn acos(self) -> Self {
        f64::acos(self)
    }

    #[inline]
    fn sin(self) -> Self {
        f64::sin(self)
    }

    #[inline]
    fn cos(self) -> Self {
        f64::cos(self)
    }
}
