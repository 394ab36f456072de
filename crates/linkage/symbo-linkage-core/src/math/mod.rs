//! Small planar math layer: a [`Scalar`] trait, forward-mode [`Dual`] numbers and a
//! generic [`Vec2`].

mod dual;
mod scalar;
mod vec2;

pub use dual::Dual;
pub use scalar::Scalar;
pub use vec2::Vec2;
