use bevy::prelude::*;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use symbo_linkage_core::{JointId, Linkage, LinkageError, PathOptimizerConfig, Vec2};

/// The linkage driven by the plugin. Insert a prepared one before or after adding the
/// plugin; an unprepared linkage is left alone.
#[derive(Resource, Default, Clone)]
pub struct LinkageResource(pub Linkage);

impl LinkageResource {
    /// Build and prepare a linkage from a JSON definition.
    pub fn from_json(json: &str) -> Result<Self, LinkageError> {
        let mut linkage = Linkage::from_json(json)?;
        linkage.prepare()?;
        Ok(LinkageResource(linkage))
    }
}

/// Positions published by the last successful simulation, indexed by joint.
#[derive(Resource, Default, Clone, Debug)]
pub struct SimulatedPositions(pub Vec<Vec2>);

/// Constant motor speeds in revolutions per second.
#[derive(Resource, Default, Clone, Debug)]
pub struct MotorDrives(pub HashMap<JointId, f64>);

#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkagePluginConfig {
    /// Keep stepping toward the most recent goal every frame instead of once per request.
    pub optimize_every_frame: bool,
    /// Sampling and step settings used for path goals.
    pub path: PathOptimizerConfig,
}

/// What the optimizer is currently pulling toward.
#[derive(Clone, Debug, PartialEq)]
pub enum OptimizerGoal {
    Point { joint: JointId, desired: Vec2 },
    Path { joint: JointId, path: Vec<Vec2> },
}

#[derive(Resource, Default, Clone, Debug)]
pub struct ActiveGoal(pub Option<OptimizerGoal>);

/// Per-frame bookkeeping for hosts and tests.
#[derive(Resource, Default, Clone, Debug)]
pub struct LinkageDiagnostics {
    pub frames_simulated: u64,
    pub degenerate_frames: u64,
    pub optimizer_steps: u64,
    pub last_objective: Option<f64>,
    pub last_error: Option<String>,
}
