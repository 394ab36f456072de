use bevy::prelude::*;
use symbo_linkage_core::{JointId, Vec2};

pub mod resources;
pub mod systems;

pub use resources::{
    ActiveGoal, LinkageDiagnostics, LinkagePluginConfig, LinkageResource, MotorDrives,
    OptimizerGoal, SimulatedPositions,
};

#[derive(Event, Clone, Debug)]
pub struct SetMotorRotation {
    pub joint: JointId,
    pub angle: f64,
}

/// Pull `joint` toward `desired` by one optimizer step.
#[derive(Event, Clone, Debug)]
pub struct OptimizeTowards {
    pub joint: JointId,
    pub desired: Vec2,
}

/// Pull `joint`'s trajectory toward a polyline by one optimizer step.
#[derive(Event, Clone, Debug)]
pub struct OptimizeAlongPath {
    pub joint: JointId,
    pub path: Vec<Vec2>,
}

pub struct SymboLinkagePlugin;

impl Plugin for SymboLinkagePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LinkageResource>()
            .init_resource::<SimulatedPositions>()
            .init_resource::<MotorDrives>()
            .init_resource::<LinkagePluginConfig>()
            .init_resource::<ActiveGoal>()
            .init_resource::<LinkageDiagnostics>()
            .add_event::<SetMotorRotation>()
            .add_event::<OptimizeTowards>()
            .add_event::<OptimizeAlongPath>()
            .add_systems(
                Update,
                (
                    systems::drive_motors_system,
                    systems::apply_motor_rotations_system,
                    systems::optimize_system,
                    systems::simulate_system,
                )
                    .chain(),
            );
    }
}
