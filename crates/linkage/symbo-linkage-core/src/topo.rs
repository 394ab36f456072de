use log::trace;
use std::collections::VecDeque;

use crate::error::LinkageError;
use crate::types::{Dependencies, Joint, JointId, JointKind};

/// Result of dependency resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Dynamic joints in evaluation order.
    pub order: Vec<JointId>,
    /// Dependencies for every dynamic joint, in the same order.
    pub dependencies: Vec<(JointId, Dependencies)>,
    /// How many joints needed their dependencies swapped to be counter-clockwise.
    pub swapped: usize,
}

/// Offer `source` as a resolved neighbour to each of its dynamic neighbours. A dynamic
/// joint becomes ready the moment it has collected two candidates.
fn offer(
    joints: &[Joint],
    source: JointId,
    candidates: &mut [Vec<JointId>],
    ready: &mut VecDeque<JointId>,
) {
    for &adj in &joints[source].adjacent {
        if joints[adj].is_dynamic() {
            candidates[adj].push(source);
            if candidates[adj].len() == 2 {
                ready.push_back(adj);
            }
        }
    }
}

/// Assign `i`/`j` so that `i -> j -> joint` is counter-clockwise in the initial layout.
/// Returns the dependencies and whether a swap was needed.
fn oriented(joints: &[Joint], joint: JointId, i: JointId, j: JointId) -> (Dependencies, bool) {
    let k = joints[joint].initial;
    let to_i = joints[i].initial - k;
    let to_j = joints[j].initial - k;
    let deps = Dependencies {
        dependant_i: i,
        dependant_j: j,
        distance_to_i: to_i.norm(),
        distance_to_j: to_j.norm(),
    };
    if to_i.cross(&to_j) < 0.0 {
        let swapped = Dependencies {
            dependant_i: j,
            dependant_j: i,
            distance_to_i: deps.distance_to_j,
            distance_to_j: deps.distance_to_i,
        };
        (swapped, true)
    } else {
        (deps, false)
    }
}

/// Kahn-style propagation from static and motorized joints outward.
///
/// Static joints seed first, then motorized joints, each in creation order. Ready joints
/// are processed FIFO and take their first two candidates as dependencies.
pub fn resolve_dependencies(joints: &[Joint]) -> Result<Resolution, LinkageError> {
    let mut candidates: Vec<Vec<JointId>> = vec![Vec::new(); joints.len()];
    let mut ready: VecDeque<JointId> = VecDeque::new();

    for joint in joints.iter().filter(|j| matches!(j.kind, JointKind::Static)) {
        offer(joints, joint.index, &mut candidates, &mut ready);
    }
    for joint in joints
        .iter()
        .filter(|j| matches!(j.kind, JointKind::Motorized { .. }))
    {
        offer(joints, joint.index, &mut candidates, &mut ready);
    }

    let mut order = Vec::new();
    let mut dependencies = Vec::new();
    let mut swapped = 0;
    while let Some(current) = ready.pop_front() {
        let (deps, flipped) = oriented(
            joints,
            current,
            candidates[current][0],
            candidates[current][1],
        );
        if flipped {
            trace!("joint {current}: swapped dependencies to keep counter-clockwise order");
            swapped += 1;
        }
        dependencies.push((current, deps));
        order.push(current);
        offer(joints, current, &mut candidates, &mut ready);
    }

    let total = joints.iter().filter(|j| j.is_dynamic()).count();
    if order.len() < total {
        let pending = joints
            .iter()
            .filter(|j| j.is_dynamic() && candidates[j.index].len() < 2)
            .map(|j| j.index)
            .collect();
        return Err(LinkageError::Unresolvable {
            resolved: order.len(),
            total,
            pending,
        });
    }

    Ok(Resolution {
        order,
        dependencies,
        swapped,
    })
}
