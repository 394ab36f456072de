//! Forward-mode dual numbers.
//!
//! A [`Dual`] carries a primal value together with its partial derivatives with respect to
//! a fixed set of seeded inputs. Every operation applies the matching differentiation rule
//! (sum, product, quotient and chain rules), so evaluating a formula over `Dual` yields the
//! exact gradient alongside the value.
//!
//! An empty partials vector stands for "all partials are zero", which keeps constants cheap.
//! Mixed-length operands are padded with zeros.

use std::ops::{Add, Div, Mul, Neg, Sub};

use super::Scalar;

#[derive(Debug, Clone, PartialEq)]
pub struct Dual {
    value: f64,
    partials: Vec<f64>,
}

impl Dual {
    /// A value that does not depend on any seeded input.
    pub fn constant(value: f64) -> Self {
        Dual {
            value,
            partials: Vec::new(),
        }
    }

    /// Seed input number `index` out of `count` independent inputs.
    pub fn variable(value: f64, index: usize, count: usize) -> Self {
        let mut partials = vec![0.0; count];
        if let Some(slot) = partials.get_mut(index) {
            *slot = 1.0;
        }
        Dual { value, partials }
    }

    /// Seed every entry of `values` as its own independent input.
    pub fn seed_all(values: &[f64]) -> Vec<Dual> {
        let count = values.len();
        values
            .iter()
            .enumerate()
            .map(|(index, value)| Dual::variable(*value, index, count))
            .collect()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn partials(&self) -> &[f64] {
        &self.partials
    }

    /// Partial derivative with respect to input `index` (zero when never seeded).
    pub fn partial(&self, index: usize) -> f64 {
        self.partials.get(index).copied().unwrap_or(0.0)
    }

    /// Dense gradient of length `count`.
    pub fn gradient(&self, count: usize) -> Vec<f64> {
        (0..count).map(|index| self.partial(index)).collect()
    }

    /// Apply a unary function with value `value` and derivative `derivative` at `self`.
    fn chain(self, value: f64, derivative: f64) -> Dual {
        let partials = self.partials.into_iter().map(|d| d * derivative).collect();
        Dual { value, partials }
    }
}

/// `ca * a + cb * b`, treating missing entries as zero.
fn combine(a: &[f64], ca: f64, b: &[f64], cb: f64) -> Vec<f64> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let da = a.get(i).copied().unwrap_or(0.0);
            let db = b.get(i).copied().unwrap_or(0.0);
            ca * da + cb * db
        })
        .collect()
}

impl Add for Dual {
    type Output = Dual;

    fn add(self, rhs: Dual) -> Dual {
        Dual {
            value: self.value + rhs.value,
            partials: combine(&self.partials, 1.0, &rhs.partials, 1.0),
        }
    }
}

impl Sub for Dual {
    type Output = Dual;

    fn sub(self, rhs: Dual) -> Dual {
        Dual {
            value: self.value - rhs.value,
            partials: combine(&self.partials, 1.0, &rhs.partials, -1.0),
        }
    }
}

impl Mul for Dual {
    type Output = Dual;

    fn mul(self, rhs: Dual) -> Dual {
        Dual {
            value: self.value * rhs.value,
            partials: combine(&self.partials, rhs.value, &rhs.partials, self.value),
        }
    }
}

impl Div for Dual {
    type Output = Dual;

    fn div(self, rhs: Dual) -> Dual {
        let inv = 1.0 / rhs.value;
        Dual {
            value: self.value / rhs.value,
            partials: combine(
                &self.partials,
                inv,
                &rhs.partials,
                -self.value * inv * inv,
            ),
        }
    }
}

impl Neg for Dual {
    type Output = Dual;

    fn neg(self) -> Dual {
        let value = -self.value;
        self.chain(value, -1.0)
    }
}

impl Scalar for Dual {
    fn constant(value: f64) -> Self {
        Dual::constant(value)
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn sqrt(self) -> Self {
        let root = self.value.sqrt();
        self.chain(root, 0.5 / root)
    }

    fn acos(self) -> Self {
        let x = self.value;
        self.chain(x.acos(), -1.0 / (1.0 - x * x).sqrt())
    }

    fn sin(self) -> Self {
        let x = self.value;
        self.chain(x.sin(), x.cos())
    }

    fn cos(self) -> Self {
        let x = self.value;
        self.chain(x.cos(), -x.sin())
    }
}
