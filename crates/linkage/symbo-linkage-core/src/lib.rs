//! Planar linkage kinematics.
//!
//! A [`Linkage`] is a graph of static, motorized and dynamic joints connected by rigid bars.
//! After [`Linkage::prepare`] resolves which two joints each dynamic joint is triangulated
//! from, [`simulate`] computes every joint position for the current motor angles, and
//! [`edge_length_gradients`] / [`optimize_for_target`] differentiate that pass with respect
//! to bar lengths.

pub mod config;
pub mod definition;
pub mod error;
pub mod eval;
pub mod linkage;
pub mod math;
pub mod optimize;
pub mod topo;
pub mod types;

pub use config::{OptimizerConfig, PathOptimizerConfig};
pub use error::LinkageError;
pub use eval::{
    edge_length_gradients, fill_positions, simulate, simulate_with_offset, solve_triangle,
};
pub use linkage::Linkage;
pub use math::{Dual, Scalar, Vec2};
pub use optimize::{optimize_for_path, optimize_for_target};
pub use topo::{resolve_dependencies, Resolution};
pub use types::*;
