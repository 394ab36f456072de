use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Dense joint index, assigned in creation order starting at 0.
pub type JointId = usize;
/// Position of a bar in the flat bar sequence.
pub type BarId = usize;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JointType {
    Static,
    Motorized,
    Dynamic,
}

/// The two joints a dynamic joint is triangulated from, and its rest distances to them.
///
/// `dependant_i -> dependant_j -> joint` is counter-clockwise in the initial layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dependencies {
    pub dependant_i: JointId,
    pub dependant_j: JointId,
    pub distance_to_i: f64,
    pub distance_to_j: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum JointKind {
    Static,
    Motorized {
        motor: JointId,
        distance_to_motor: f64,
        /// Current angle in radians, counter-clockwise.
        rotation: f64,
    },
    Dynamic {
        /// Filled in by dependency resolution.
        dependencies: Option<Dependencies>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub index: JointId,
    pub initial: Vec2,
    pub adjacent: Vec<JointId>,
    pub kind: JointKind,
}

impl Joint {
    pub fn joint_type(&self) -> JointType {
        match self.kind {
            JointKind::Static => JointType::Static,
            JointKind::Motorized { .. } => JointType::Motorized,
            JointKind::Dynamic { .. } => JointType::Dynamic,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, JointKind::Dynamic { .. })
    }

    pub fn dependencies(&self) -> Option<&Dependencies> {
        match &self.kind {
            JointKind::Dynamic { dependencies } => dependencies.as_ref(),
            _ => None,
        }
    }
}

/// Undirected rigid connection between two joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bar {
    pub a: JointId,
    pub b: JointId,
}

impl Bar {
    /// Order-insensitive lookup key.
    pub fn key(a: JointId, b: JointId) -> (JointId, JointId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Gradient of the positional error with respect to one bar's length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarGradient {
    pub a: JointId,
    pub b: JointId,
    pub gradient: f64,
}

/// Objective value plus one [`BarGradient`] per bar, in bar order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthGradient {
    pub objective: f64,
    pub bars: Vec<BarGradient>,
}

/// Outcome of one optimizer call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Objective measured before the step.
    pub objective: f64,
    /// Multiplier that was applied to the gradient.
    pub step_scale: f64,
    /// False when the gradient was not finite and no length changed.
    pub applied: bool,
}

// --- Serializable definitions ---------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum JointSpecKind {
    Static,
    Motorized {
        motor: String,
        /// Rest distance to the motor; derived from positions when absent.
        #[serde(default)]
        distance: Option<f64>,
    },
    Dynamic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JointSpec {
    pub id: String,
    #[serde(flatten)]
    pub kind: JointSpecKind,
    pub x: f64,
    pub y: f64,
}

/// A linkage as a JSON document. Joints are created in listed order.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LinkageSpec {
    pub joints: Vec<JointSpec>,
    #[serde(default)]
    pub bars: Vec<[String; 2]>,
}
