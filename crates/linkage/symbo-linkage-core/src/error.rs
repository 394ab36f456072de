use thiserror::Error;

use crate::types::JointId;

/// Every failure the linkage engine reports to its caller.
#[derive(Debug, Error)]
pub enum LinkageError {
    #[error("joint index {index} is out of range (linkage has {len} joints)")]
    JointOutOfRange { index: JointId, len: usize },

    #[error("joint {joint} cannot be driven by dynamic joint {motor}")]
    InvalidMotor { joint: JointId, motor: JointId },

    #[error("joint {joint} cannot be connected to itself")]
    SelfBar { joint: JointId },

    #[error("joints {a} and {b} are already connected")]
    DuplicateBar { a: JointId, b: JointId },

    #[error("joint {joint} is not motorized")]
    NotMotorized { joint: JointId },

    #[error("resolved {resolved} of {total} dynamic joints; unresolved: {pending:?}")]
    Unresolvable {
        resolved: usize,
        total: usize,
        pending: Vec<JointId>,
    },

    #[error("linkage has not been prepared for simulation")]
    NotPrepared,

    #[error("joint {joint} has no finite position for the current lengths and motor angles")]
    Degenerate { joint: JointId },

    #[error("output buffers hold {actual} entries, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("invalid linkage definition: {0}")]
    InvalidDefinition(String),

    #[error("linkage json: {0}")]
    Json(#[from] serde_json::Error),
}
