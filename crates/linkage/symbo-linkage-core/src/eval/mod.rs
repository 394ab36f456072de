//! Forward kinematics.
//!
//! [`solve_positions`] is written once against [`Scalar`] and serves both evaluators:
//!
//! - over `f64` it is the per-step forward pass behind [`simulate`];
//! - over [`Dual`](crate::math::Dual) it is the differentiable pass in [`gradient`].
//!
//! Evaluation order is fixed: static joints, motorized joints in creation order, then
//! dynamic joints in the order produced by dependency resolution.

use log::warn;

use crate::error::LinkageError;
use crate::linkage::Linkage;
use crate::math::{Scalar, Vec2};
use crate::types::{JointId, JointKind};

pub mod gradient;
mod triangle;

pub use gradient::edge_length_gradients;
pub use triangle::solve_triangle;

#[cfg(test)]
mod tests;

/// Length of the bar between `a` and `b` from `lengths`, or `fallback` when the two
/// joints are not connected.
fn bar_length<S: Scalar>(
    linkage: &Linkage,
    lengths: &[S],
    a: JointId,
    b: JointId,
    fallback: f64,
) -> S {
    linkage
        .bar_between(a, b)
        .and_then(|bar| lengths.get(bar))
        .cloned()
        .unwrap_or_else(|| S::constant(fallback))
}

/// Position of every joint for the given bar lengths (aligned with
/// [`Linkage::bars`]). Every motor angle is offset by `rotation_offset`.
pub(crate) fn solve_positions<S: Scalar>(
    linkage: &Linkage,
    lengths: &[S],
    rotation_offset: f64,
) -> Result<Vec<Vec2<S>>, LinkageError> {
    let order = linkage.evaluation_order().ok_or(LinkageError::NotPrepared)?;
    let joints = linkage.joints();

    // Static joints keep their initial position; everything else is overwritten below.
    let mut positions: Vec<Vec2<S>> = joints.iter().map(|j| j.initial.lift()).collect();

    for &index in linkage.motorized() {
        if let JointKind::Motorized {
            motor,
            distance_to_motor,
            rotation,
        } = joints[index].kind
        {
            let rest = bar_length(linkage, lengths, index, motor, distance_to_motor);
            let arm = Vec2::new(rest, S::constant(0.0))
                .rotate(S::constant(rotation + rotation_offset));
            let pin = arm + positions[motor].clone();
            if !pin.is_finite() {
                return Err(LinkageError::Degenerate { joint: index });
            }
            positions[index] = pin;
        }
    }

    for &index in order {
        let deps = joints[index]
            .dependencies()
            .ok_or(LinkageError::NotPrepared)?;
        let dist_ik = bar_length(linkage, lengths, index, deps.dependant_i, deps.distance_to_i);
        let dist_jk = bar_length(linkage, lengths, index, deps.dependant_j, deps.distance_to_j);
        let k = triangle::triangulate(
            &positions[deps.dependant_i],
            &positions[deps.dependant_j],
            dist_ik,
            dist_jk,
        );
        if !k.is_finite() {
            return Err(LinkageError::Degenerate { joint: index });
        }
        positions[index] = k;
    }

    Ok(positions)
}

/// Simulated position of every joint for the current motor angles and bar lengths.
pub fn simulate(linkage: &Linkage) -> Result<Vec<Vec2>, LinkageError> {
    simulate_with_offset(linkage, 0.0)
}

/// Like [`simulate`], with every motor turned a further `rotation_offset` radians.
pub fn simulate_with_offset(
    linkage: &Linkage,
    rotation_offset: f64,
) -> Result<Vec<Vec2>, LinkageError> {
    let lengths = linkage.bar_lengths();
    solve_positions(linkage, &lengths, rotation_offset).map_err(|err| {
        if let LinkageError::Degenerate { joint } = err {
            warn!("simulation degenerate at joint {joint}");
        }
        err
    })
}

/// Write simulated positions into caller-provided buffers sized to the joint count.
pub fn fill_positions(
    linkage: &Linkage,
    xs: &mut [f64],
    ys: &mut [f64],
) -> Result<(), LinkageError> {
    let expected = linkage.joint_count();
    for actual in [xs.len(), ys.len()] {
        if actual != expected {
            return Err(LinkageError::BufferSize { expected, actual });
        }
    }
    let positions = simulate(linkage)?;
    for (index, p) in positions.iter().enumerate() {
        xs[index] = p.x;
        ys[index] = p.y;
    }
    Ok(())
}
