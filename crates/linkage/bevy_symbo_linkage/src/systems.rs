use bevy::prelude::*;
use symbo_linkage_core::{optimize_for_path, optimize_for_target, simulate, LinkageError};

use crate::resources::{
    ActiveGoal, LinkageDiagnostics, LinkagePluginConfig, LinkageResource, MotorDrives,
    OptimizerGoal, SimulatedPositions,
};
use crate::{OptimizeAlongPath, OptimizeTowards, SetMotorRotation};

/// Turns every driven motor by its speed times the frame delta.
pub fn drive_motors_system(
    time: Res<Time>,
    drives: Res<MotorDrives>,
    mut linkage: ResMut<LinkageResource>,
) {
    let dt = time.delta_seconds_f64();
    if dt == 0.0 {
        return;
    }
    for (&joint, &rps) in drives.0.iter() {
        if let Err(err) = linkage.0.advance_motor(joint, dt, rps) {
            warn!("motor drive on joint {joint}: {err}");
        }
    }
}

/// Applies explicit rotation requests after the drives, so a request wins for its frame.
pub fn apply_motor_rotations_system(
    mut events: EventReader<SetMotorRotation>,
    mut linkage: ResMut<LinkageResource>,
    mut diagnostics: ResMut<LinkageDiagnostics>,
) {
    for event in events.read() {
        if let Err(err) = linkage.0.set_motor_rotation(event.joint, event.angle) {
            diagnostics.last_error = Some(err.to_string());
        }
    }
}

/// Takes one optimizer step per new request, or every frame when configured to.
pub fn optimize_system(
    mut towards: EventReader<OptimizeTowards>,
    mut along: EventReader<OptimizeAlongPath>,
    config: Res<LinkagePluginConfig>,
    mut goal: ResMut<ActiveGoal>,
    mut linkage: ResMut<LinkageResource>,
    mut diagnostics: ResMut<LinkageDiagnostics>,
) {
    let mut requested = false;
    for event in towards.read() {
        goal.0 = Some(OptimizerGoal::Point {
            joint: event.joint,
            desired: event.desired,
        });
        requested = true;
    }
    for event in along.read() {
        goal.0 = Some(OptimizerGoal::Path {
            joint: event.joint,
            path: event.path.clone(),
        });
        requested = true;
    }
    if !requested && !config.optimize_every_frame {
        return;
    }
    if !linkage.0.is_prepared() {
        return;
    }

    let result = match &goal.0 {
        Some(OptimizerGoal::Point { joint, desired }) => {
            optimize_for_target(&mut linkage.0, *joint, *desired)
        }
        Some(OptimizerGoal::Path { joint, path }) => {
            optimize_for_path(&mut linkage.0, *joint, path, &config.path)
        }
        None => return,
    };
    match result {
        Ok(report) => {
            diagnostics.optimizer_steps += 1;
            diagnostics.last_objective = Some(report.objective);
        }
        Err(err) => {
            warn!("optimizer step failed: {err}");
            diagnostics.last_error = Some(err.to_string());
        }
    }
}

/// Publishes joint positions. Degenerate frames keep the previous positions.
pub fn simulate_system(
    linkage: Res<LinkageResource>,
    mut positions: ResMut<SimulatedPositions>,
    mut diagnostics: ResMut<LinkageDiagnostics>,
) {
    if !linkage.0.is_prepared() {
        return;
    }
    match simulate(&linkage.0) {
        Ok(next) => {
            positions.0 = next;
            diagnostics.frames_simulated += 1;
        }
        Err(err @ LinkageError::Degenerate { .. }) => {
            diagnostics.degenerate_frames += 1;
            diagnostics.last_error = Some(err.to_string());
        }
        Err(err) => {
            diagnostics.last_error = Some(err.to_string());
        }
    }
}
