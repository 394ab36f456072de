//! The linkage graph: an index-addressed arena of joints plus the flat bar sequence.

use hashbrown::HashMap;
use log::{debug, warn};
use std::f64::consts::TAU;

use crate::config::OptimizerConfig;
use crate::error::LinkageError;
use crate::math::Vec2;
use crate::topo::resolve_dependencies;
use crate::types::{Bar, BarId, Dependencies, Joint, JointId, JointKind};

/// Caller-owned linkage state.
///
/// Built with the `add_*` calls, then finalized with [`Linkage::prepare`]. Any structural
/// change after that drops the resolution, and simulation calls report
/// [`LinkageError::NotPrepared`] until `prepare` runs again.
#[derive(Debug, Clone, Default)]
pub struct Linkage {
    joints: Vec<Joint>,
    bars: Vec<Bar>,
    bar_lookup: HashMap<(JointId, JointId), BarId>,
    motorized: Vec<JointId>,
    dynamic_count: usize,
    order: Option<Vec<JointId>>,
    optimizer: OptimizerConfig,
}

impl Linkage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_optimizer_config(optimizer: OptimizerConfig) -> Self {
        Linkage {
            optimizer,
            ..Default::default()
        }
    }

    /// Discard every joint and bar. The optimizer configuration is kept.
    pub fn reset(&mut self) {
        let optimizer = self.optimizer;
        *self = Linkage::with_optimizer_config(optimizer);
    }

    // --- Construction -----------------------------------------------------

    fn push_joint(&mut self, x: f64, y: f64, kind: JointKind) -> JointId {
        let index = self.joints.len();
        self.joints.push(Joint {
            index,
            initial: Vec2::new(x, y),
            adjacent: Vec::new(),
            kind,
        });
        self.order = None;
        index
    }

    pub fn add_static_joint(&mut self, x: f64, y: f64) -> JointId {
        self.push_joint(x, y, JointKind::Static)
    }

    /// Add a joint driven around `motor`. The rest distance defaults to the distance
    /// between the two initial positions.
    pub fn add_motorized_joint(
        &mut self,
        x: f64,
        y: f64,
        motor: JointId,
        distance_to_motor: Option<f64>,
    ) -> Result<JointId, LinkageError> {
        let motor_joint = self.joint(motor)?;
        if motor_joint.is_dynamic() {
            return Err(LinkageError::InvalidMotor {
                joint: self.joints.len(),
                motor,
            });
        }
        let distance_to_motor =
            distance_to_motor.unwrap_or_else(|| Vec2::new(x, y).distance(&motor_joint.initial));
        let index = self.push_joint(
            x,
            y,
            JointKind::Motorized {
                motor,
                distance_to_motor,
                rotation: 0.0,
            },
        );
        self.motorized.push(index);
        Ok(index)
    }

    pub fn add_dynamic_joint(&mut self, x: f64, y: f64) -> JointId {
        self.dynamic_count += 1;
        self.push_joint(x, y, JointKind::Dynamic { dependencies: None })
    }

    /// Connect `a` and `b`. The bar is appended to the flat sequence and mirrored into
    /// both adjacency lists.
    pub fn add_bar(&mut self, a: JointId, b: JointId) -> Result<BarId, LinkageError> {
        self.check_index(a)?;
        self.check_index(b)?;
        if a == b {
            return Err(LinkageError::SelfBar { joint: a });
        }
        let key = Bar::key(a, b);
        if self.bar_lookup.contains_key(&key) {
            return Err(LinkageError::DuplicateBar { a, b });
        }
        let id = self.bars.len();
        self.bars.push(Bar { a, b });
        self.bar_lookup.insert(key, id);
        self.joints[a].adjacent.push(b);
        self.joints[b].adjacent.push(a);
        self.order = None;
        Ok(id)
    }

    // --- Resolution -------------------------------------------------------

    /// Resolve every dynamic joint's dependencies and the evaluation order.
    ///
    /// Rest distances of dynamic joints are (re)derived from initial positions, so a
    /// repeated call discards earlier optimizer steps.
    pub fn prepare(&mut self) -> Result<(), LinkageError> {
        self.order = None;
        for joint in &mut self.joints {
            if let JointKind::Dynamic { dependencies } = &mut joint.kind {
                *dependencies = None;
            }
        }
        let resolution = resolve_dependencies(&self.joints)?;
        for (joint, deps) in resolution.dependencies {
            if let JointKind::Dynamic { dependencies } = &mut self.joints[joint].kind {
                *dependencies = Some(deps);
            }
        }
        debug!(
            "linkage prepared: {} joints, {} bars, {} dynamic ({} orientation swaps)",
            self.joints.len(),
            self.bars.len(),
            resolution.order.len(),
            resolution.swapped
        );
        self.order = Some(resolution.order);
        Ok(())
    }

    pub fn is_prepared(&self) -> bool {
        self.order.is_some()
    }

    /// Dynamic joints in the order they must be evaluated.
    pub fn evaluation_order(&self) -> Option<&[JointId]> {
        self.order.as_deref()
    }

    // --- Control ----------------------------------------------------------

    /// Set the rotation of a motorized joint. Other joints are left untouched and reported.
    pub fn set_motor_rotation(&mut self, joint: JointId, angle: f64) -> Result<(), LinkageError> {
        match self.motor_rotation_mut(joint) {
            Ok(rotation) => {
                *rotation = angle;
                Ok(())
            }
            Err(err) => {
                warn!("ignoring motor rotation for joint {joint}: {err}");
                Err(err)
            }
        }
    }

    pub fn motor_rotation(&self, joint: JointId) -> Result<f64, LinkageError> {
        match self.joint(joint)?.kind {
            JointKind::Motorized { rotation, .. } => Ok(rotation),
            _ => Err(LinkageError::NotMotorized { joint }),
        }
    }

    /// Turn a motor at `revolutions_per_second` for `dt` seconds. The angle wraps into
    /// `[0, TAU)`; the new angle is returned.
    pub fn advance_motor(
        &mut self,
        joint: JointId,
        dt: f64,
        revolutions_per_second: f64,
    ) -> Result<f64, LinkageError> {
        let rotation = self.motor_rotation_mut(joint)?;
        *rotation = (*rotation + TAU * revolutions_per_second * dt).rem_euclid(TAU);
        Ok(*rotation)
    }

    fn motor_rotation_mut(&mut self, joint: JointId) -> Result<&mut f64, LinkageError> {
        self.check_index(joint)?;
        match &mut self.joints[joint].kind {
            JointKind::Motorized { rotation, .. } => Ok(rotation),
            _ => Err(LinkageError::NotMotorized { joint }),
        }
    }

    // --- Queries ----------------------------------------------------------

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn dynamic_count(&self) -> usize {
        self.dynamic_count
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joint(&self, index: JointId) -> Result<&Joint, LinkageError> {
        self.joints.get(index).ok_or(LinkageError::JointOutOfRange {
            index,
            len: self.joints.len(),
        })
    }

    pub fn check_index(&self, index: JointId) -> Result<(), LinkageError> {
        self.joint(index).map(|_| ())
    }

    /// Motorized joints in creation order.
    pub fn motorized(&self) -> &[JointId] {
        &self.motorized
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Index of the bar connecting `a` and `b`, in either direction.
    pub fn bar_between(&self, a: JointId, b: JointId) -> Option<BarId> {
        self.bar_lookup.get(&Bar::key(a, b)).copied()
    }

    pub fn dependencies(&self, joint: JointId) -> Option<Dependencies> {
        self.joints.get(joint).and_then(|j| j.dependencies().copied())
    }

    pub(crate) fn dependencies_mut(&mut self, joint: JointId) -> Option<&mut Dependencies> {
        match &mut self.joints.get_mut(joint)?.kind {
            JointKind::Dynamic { dependencies } => dependencies.as_mut(),
            _ => None,
        }
    }

    /// Current rest length of every bar, aligned with [`Linkage::bars`].
    ///
    /// Dependency bars of resolved dynamic joints report the (possibly optimized)
    /// `distance_to_i`/`distance_to_j`, a bar between a motorized joint and its motor
    /// reports the motor distance, and every other bar its initial length.
    pub fn bar_lengths(&self) -> Vec<f64> {
        let mut lengths: Vec<f64> = self
            .bars
            .iter()
            .map(|bar| {
                self.joints[bar.a]
                    .initial
                    .distance(&self.joints[bar.b].initial)
            })
            .collect();
        for joint in &self.joints {
            match &joint.kind {
                JointKind::Motorized {
                    motor,
                    distance_to_motor,
                    ..
                } => {
                    if let Some(bar) = self.bar_between(joint.index, *motor) {
                        lengths[bar] = *distance_to_motor;
                    }
                }
                JointKind::Dynamic {
                    dependencies: Some(deps),
                } => {
                    if let Some(bar) = self.bar_between(joint.index, deps.dependant_i) {
                        lengths[bar] = deps.distance_to_i;
                    }
                    if let Some(bar) = self.bar_between(joint.index, deps.dependant_j) {
                        lengths[bar] = deps.distance_to_j;
                    }
                }
                _ => {}
            }
        }
        lengths
    }

    pub fn optimizer_config(&self) -> &OptimizerConfig {
        &self.optimizer
    }

    pub fn set_optimizer_config(&mut self, optimizer: OptimizerConfig) {
        self.optimizer = optimizer;
    }
}
