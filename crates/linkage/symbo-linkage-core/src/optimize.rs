//! Single-step bar-length optimization.
//!
//! Each call takes one bounded gradient step on the rest distances of dynamic joints and
//! returns. Converging is left to the caller, typically by calling once per frame.
//! Motorized rest distances and all other bars are never changed.

use log::{debug, warn};

use crate::config::{OptimizerConfig, PathOptimizerConfig};
use crate::error::LinkageError;
use crate::eval::gradient::{path_objective, target_objective, ObjectiveGradient};
use crate::linkage::Linkage;
use crate::math::Vec2;
use crate::types::{JointId, StepReport};

fn apply_step(
    linkage: &mut Linkage,
    result: &ObjectiveGradient,
    config: &OptimizerConfig,
) -> Result<StepReport, LinkageError> {
    let step_scale = config.step_scale(result.objective);
    if !result.objective.is_finite() || result.gradient.iter().any(|g| !g.is_finite()) {
        warn!(
            "skipping optimizer step: non-finite gradient (objective {})",
            result.objective
        );
        return Ok(StepReport {
            objective: result.objective,
            step_scale,
            applied: false,
        });
    }

    let order = linkage
        .evaluation_order()
        .ok_or(LinkageError::NotPrepared)?
        .to_vec();
    for joint in order {
        let Some(deps) = linkage.dependencies(joint) else {
            continue;
        };
        let grad_i = linkage
            .bar_between(joint, deps.dependant_i)
            .map_or(0.0, |bar| result.gradient[bar]);
        let grad_j = linkage
            .bar_between(joint, deps.dependant_j)
            .map_or(0.0, |bar| result.gradient[bar]);
        if let Some(deps) = linkage.dependencies_mut(joint) {
            deps.distance_to_i -= step_scale * grad_i;
            deps.distance_to_j -= step_scale * grad_j;
        }
    }
    debug!(
        "optimizer step: objective {:.6}, scale {:.6}",
        result.objective, step_scale
    );
    Ok(StepReport {
        objective: result.objective,
        step_scale,
        applied: true,
    })
}

/// Move `target`'s simulated position toward `desired` by one bounded gradient step,
/// using the linkage's own [`OptimizerConfig`].
pub fn optimize_for_target(
    linkage: &mut Linkage,
    target: JointId,
    desired: Vec2,
) -> Result<StepReport, LinkageError> {
    let config = *linkage.optimizer_config();
    let result = target_objective(linkage, target, desired, 0.0)?;
    apply_step(linkage, &result, &config)
}

/// Pull `target`'s trajectory over one motor revolution toward the polyline `path`.
///
/// Motors are sampled at `config.resolution` evenly spaced phase offsets; the objective
/// is the mean distance to the nearest path point. Motor angles are not modified.
pub fn optimize_for_path(
    linkage: &mut Linkage,
    target: JointId,
    path: &[Vec2],
    config: &PathOptimizerConfig,
) -> Result<StepReport, LinkageError> {
    let result = path_objective(linkage, target, path, config.resolution)?;
    apply_step(linkage, &result, &config.step)
}
