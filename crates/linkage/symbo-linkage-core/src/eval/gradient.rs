//! Differentiable forward kinematics.
//!
//! Every bar length is seeded as an independent [`Dual`] input and the regular forward pass
//! runs on duals. The objective is the Euclidean distance between a joint's simulated
//! position and a desired point; its partials are the gradient with respect to the whole
//! bar-length vector.

use crate::error::LinkageError;
use crate::linkage::Linkage;
use crate::math::{Dual, Scalar, Vec2};
use crate::types::{BarGradient, JointId, LengthGradient};

use super::solve_positions;

/// Objective value and dense gradient, aligned with [`Linkage::bars`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ObjectiveGradient {
    pub objective: f64,
    pub gradient: Vec<f64>,
}

/// `|position - desired|` with derivatives. At zero distance the gradient is zero.
fn distance_objective(position: &Vec2<Dual>, desired: &Vec2, count: usize) -> ObjectiveGradient {
    let diff = position.clone() - desired.lift();
    let squared = diff.norm_squared();
    if squared.value() == 0.0 {
        return ObjectiveGradient {
            objective: 0.0,
            gradient: vec![0.0; count],
        };
    }
    let distance = squared.sqrt();
    ObjectiveGradient {
        objective: distance.value(),
        gradient: distance.gradient(count),
    }
}

/// Dual-number positions for the current bar lengths.
pub(crate) fn dual_positions(
    linkage: &Linkage,
    lengths: &[f64],
    rotation_offset: f64,
) -> Result<Vec<Vec2<Dual>>, LinkageError> {
    let seeded = Dual::seed_all(lengths);
    solve_positions(linkage, &seeded, rotation_offset)
}

/// Objective and gradient for moving `target` toward `desired` at the current state.
pub(crate) fn target_objective(
    linkage: &Linkage,
    target: JointId,
    desired: Vec2,
    rotation_offset: f64,
) -> Result<ObjectiveGradient, LinkageError> {
    linkage.check_index(target)?;
    let lengths = linkage.bar_lengths();
    let positions = dual_positions(linkage, &lengths, rotation_offset)?;
    Ok(distance_objective(
        &positions[target],
        &desired,
        lengths.len(),
    ))
}

/// Gradient of `|position(target) - desired|` with respect to every bar length.
///
/// Returns one entry per bar, in bar order, together with the objective.
pub fn edge_length_gradients(
    linkage: &Linkage,
    target: JointId,
    desired: Vec2,
) -> Result<LengthGradient, LinkageError> {
    let result = target_objective(linkage, target, desired, 0.0)?;
    let bars = linkage
        .bars()
        .iter()
        .zip(result.gradient.iter())
        .map(|(bar, gradient)| BarGradient {
            a: bar.a,
            b: bar.b,
            gradient: *gradient,
        })
        .collect();
    Ok(LengthGradient {
        objective: result.objective,
        bars,
    })
}

/// Objective and gradient for a polyline target, averaged over `resolution` motor phases.
///
/// At each phase the nearest path point is the target. Phases whose configuration is
/// degenerate are skipped; if every phase is degenerate the first error is returned.
pub(crate) fn path_objective(
    linkage: &Linkage,
    target: JointId,
    path: &[Vec2],
    resolution: usize,
) -> Result<ObjectiveGradient, LinkageError> {
    linkage.check_index(target)?;
    let lengths = linkage.bar_lengths();
    let count = lengths.len();
    let mut total = ObjectiveGradient {
        objective: 0.0,
        gradient: vec![0.0; count],
    };
    if path.is_empty() || resolution == 0 {
        return Ok(total);
    }

    let mut used = 0usize;
    let mut first_error = None;
    for sample in 0..resolution {
        let offset = std::f64::consts::TAU * sample as f64 / resolution as f64;
        let positions = match dual_positions(linkage, &lengths, offset) {
            Ok(positions) => positions,
            Err(err @ LinkageError::Degenerate { .. }) => {
                log::debug!("path sample {sample} skipped: {err}");
                first_error.get_or_insert(err);
                continue;
            }
            Err(err) => return Err(err),
        };
        let here = positions[target].value();
        let nearest = path
            .iter()
            .min_by(|a, b| here.distance(a).total_cmp(&here.distance(b)))
            .copied()
            .unwrap_or(here);
        let term = distance_objective(&positions[target], &nearest, count);
        total.objective += term.objective;
        for (acc, g) in total.gradient.iter_mut().zip(term.gradient) {
            *acc += g;
        }
        used += 1;
    }

    if used == 0 {
        return Err(first_error.unwrap_or(LinkageError::NotPrepared));
    }
    let inv = 1.0 / used as f64;
    total.objective *= inv;
    total.gradient.iter_mut().for_each(|g| *g *= inv);
    Ok(total)
}
