//! Behavioural coverage for forward kinematics and bar-length gradients.

use super::*;
use crate::math::Vec2;
use crate::optimize::optimize_for_target;
use std::f64::consts::{FRAC_PI_2, PI};

fn approx_vec(actual: Vec2, expected: Vec2, tol: f64) {
    assert!(
        actual.distance(&expected) < tol,
        "expected {expected:?}, got {actual:?}"
    );
}

fn triangle() -> Linkage {
    let mut l = Linkage::new();
    let a = l.add_static_joint(0.0, 0.0);
    let b = l.add_static_joint(2.0, 0.0);
    let c = l.add_dynamic_joint(1.0, 1.0);
    l.add_bar(a, c).unwrap();
    l.add_bar(b, c).unwrap();
    l.prepare().unwrap();
    l
}

fn crank() -> Linkage {
    let mut l = Linkage::new();
    let o = l.add_static_joint(0.0, 0.0);
    let p = l.add_motorized_joint(5.0, 0.0, o, Some(5.0)).unwrap();
    l.add_bar(o, p).unwrap();
    l.prepare().unwrap();
    l
}

/// Crank-rocker four-bar with a coupler point E on top: A=0, D=1, B=2, C=3, E=4.
fn coupler_four_bar() -> Linkage {
    let mut l = Linkage::new();
    let a = l.add_static_joint(0.0, 0.0);
    let d = l.add_static_joint(4.0, 0.0);
    let b = l.add_motorized_joint(1.0, 0.0, a, None).unwrap();
    let c = l.add_dynamic_joint(3.5, 2.5);
    let e = l.add_dynamic_joint(2.5, 3.5);
    l.add_bar(a, b).unwrap();
    l.add_bar(b, c).unwrap();
    l.add_bar(c, d).unwrap();
    l.add_bar(b, e).unwrap();
    l.add_bar(c, e).unwrap();
    l.prepare().unwrap();
    l
}

// --- Forward kinematics --------------------------------------------------

#[test]
fn it_should_reproduce_the_rest_layout() {
    let l = triangle();
    let positions = simulate(&l).unwrap();
    approx_vec(positions[2], Vec2::new(1.0, 1.0), 1e-12);

    let l = coupler_four_bar();
    let positions = simulate(&l).unwrap();
    for joint in l.joints() {
        approx_vec(positions[joint.index], joint.initial, 1e-9);
    }
}

#[test]
fn it_should_rotate_motors_counter_clockwise() {
    let mut l = crank();
    approx_vec(simulate(&l).unwrap()[1], Vec2::new(5.0, 0.0), 1e-12);

    l.set_motor_rotation(1, FRAC_PI_2).unwrap();
    approx_vec(simulate(&l).unwrap()[1], Vec2::new(0.0, 5.0), 1e-12);
}

#[test]
fn it_should_keep_static_joints_in_place() {
    let mut l = coupler_four_bar();
    l.set_motor_rotation(2, 1.3).unwrap();
    let positions = simulate(&l).unwrap();
    assert_eq!(positions[0], Vec2::new(0.0, 0.0));
    assert_eq!(positions[1], Vec2::new(4.0, 0.0));

    let report = optimize_for_target(&mut l, 4, Vec2::new(2.0, 4.5)).unwrap();
    assert!(report.applied);
    let optimized = simulate(&l).unwrap();
    assert_eq!(optimized[0], Vec2::new(0.0, 0.0));
    assert_eq!(optimized[1], Vec2::new(4.0, 0.0));
    assert_ne!(optimized[4], positions[4]);
}

#[test]
fn it_should_preserve_motor_distance_at_every_angle() {
    let mut l = crank();
    for step in 0..16 {
        l.set_motor_rotation(1, step as f64 * PI / 8.0).unwrap();
        let positions = simulate(&l).unwrap();
        assert!((positions[1].distance(&positions[0]) - 5.0).abs() < 1e-12);
    }
}

#[test]
fn it_should_preserve_bar_lengths_through_a_revolution() {
    let mut l = coupler_four_bar();
    let lengths = l.bar_lengths();
    for step in 0..24 {
        l.set_motor_rotation(2, step as f64 * PI / 12.0).unwrap();
        let positions = simulate(&l).unwrap();
        for (bar, length) in l.bars().iter().zip(&lengths) {
            let actual = positions[bar.a].distance(&positions[bar.b]);
            assert!((actual - length).abs() < 1e-9, "bar {bar:?} at step {step}");
        }
    }
}

#[test]
fn it_should_be_deterministic() {
    let mut l = coupler_four_bar();
    l.set_motor_rotation(2, 0.7).unwrap();
    assert_eq!(simulate(&l).unwrap(), simulate(&l).unwrap());
}

#[test]
fn it_should_follow_resolved_order_not_creation_order() {
    let mut l = Linkage::new();
    let late = l.add_dynamic_joint(1.0, 2.0);
    let a = l.add_static_joint(0.0, 0.0);
    let b = l.add_static_joint(2.0, 0.0);
    let early = l.add_dynamic_joint(1.0, 1.0);
    l.add_bar(a, early).unwrap();
    l.add_bar(b, early).unwrap();
    l.add_bar(early, late).unwrap();
    l.add_bar(b, late).unwrap();
    l.prepare().unwrap();

    assert_eq!(l.evaluation_order().unwrap(), &[early, late]);
    let positions = simulate(&l).unwrap();
    approx_vec(positions[late], Vec2::new(1.0, 2.0), 1e-12);
}

#[test]
fn it_should_orient_every_dependency_pair_counter_clockwise() {
    let l = coupler_four_bar();
    for &joint in l.evaluation_order().unwrap() {
        let deps = l.dependencies(joint).unwrap();
        let k = l.joints()[joint].initial;
        let to_i = l.joints()[deps.dependant_i].initial - k;
        let to_j = l.joints()[deps.dependant_j].initial - k;
        assert!(to_i.cross(&to_j) >= 0.0, "joint {joint}");
    }
}

#[test]
fn it_should_refuse_to_simulate_before_prepare() {
    let mut l = Linkage::new();
    l.add_static_joint(0.0, 0.0);
    assert!(matches!(simulate(&l), Err(LinkageError::NotPrepared)));

    let mut l = triangle();
    l.add_dynamic_joint(3.0, 3.0);
    assert!(matches!(simulate(&l), Err(LinkageError::NotPrepared)));
}

#[test]
fn it_should_report_unreachable_configurations() {
    let mut l = Linkage::new();
    let a = l.add_static_joint(0.0, 0.0);
    let d = l.add_static_joint(4.0, 0.0);
    let b = l.add_motorized_joint(3.0, 0.0, a, None).unwrap();
    let c = l.add_dynamic_joint(3.5, 1.0);
    l.add_bar(a, b).unwrap();
    l.add_bar(b, c).unwrap();
    l.add_bar(c, d).unwrap();
    l.prepare().unwrap();
    assert!(simulate(&l).is_ok());

    l.set_motor_rotation(b, PI).unwrap();
    assert!(matches!(
        simulate(&l),
        Err(LinkageError::Degenerate { joint }) if joint == c
    ));
}

#[test]
fn it_should_report_non_finite_motor_positions() {
    let mut l = crank();
    l.set_motor_rotation(1, f64::NAN).unwrap();
    assert!(matches!(
        simulate(&l),
        Err(LinkageError::Degenerate { joint: 1 })
    ));

    let mut l = Linkage::new();
    let o = l.add_static_joint(0.0, 0.0);
    let p = l.add_motorized_joint(5.0, 0.0, o, Some(f64::INFINITY)).unwrap();
    l.add_bar(o, p).unwrap();
    l.prepare().unwrap();
    assert!(matches!(
        simulate(&l),
        Err(LinkageError::Degenerate { joint }) if joint == p
    ));
}

#[test]
fn it_should_blame_the_motor_not_its_dependants() {
    let mut l = coupler_four_bar();
    l.set_motor_rotation(2, f64::INFINITY).unwrap();
    assert!(matches!(
        simulate(&l),
        Err(LinkageError::Degenerate { joint: 2 })
    ));
}

#[test]
fn it_should_fill_caller_buffers() {
    let l = triangle();
    let mut xs = [0.0; 3];
    let mut ys = [0.0; 3];
    fill_positions(&l, &mut xs, &mut ys).unwrap();
    assert_eq!(xs[1], 2.0);
    assert!((xs[2] - 1.0).abs() < 1e-12 && (ys[2] - 1.0).abs() < 1e-12);

    let mut short = [0.0; 2];
    assert!(matches!(
        fill_positions(&l, &mut short, &mut ys),
        Err(LinkageError::BufferSize {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn it_should_offset_every_motor() {
    let l = crank();
    let positions = simulate_with_offset(&l, PI).unwrap();
    approx_vec(positions[1], Vec2::new(-5.0, 0.0), 1e-12);
}

// --- Gradients -----------------------------------------------------------

fn objective_at(l: &Linkage, lengths: &[f64], target: JointId, desired: Vec2) -> f64 {
    solve_positions(l, lengths, 0.0).unwrap()[target].distance(&desired)
}

#[test]
fn it_should_match_the_plain_evaluator_exactly() {
    let mut l = coupler_four_bar();
    l.set_motor_rotation(2, 2.1).unwrap();
    let plain = simulate(&l).unwrap();
    let dual = gradient::dual_positions(&l, &l.bar_lengths(), 0.0).unwrap();
    let primal: Vec<Vec2> = dual.iter().map(|p| p.value()).collect();
    assert_eq!(plain, primal);
}

#[test]
fn it_should_agree_with_finite_differences() {
    let mut l = coupler_four_bar();
    l.set_motor_rotation(2, 0.3).unwrap();
    let desired = Vec2::new(2.0, 4.2);
    let result = edge_length_gradients(&l, 4, desired).unwrap();
    assert_eq!(result.bars.len(), l.bars().len());

    let lengths = l.bar_lengths();
    let h = 1e-6;
    for (bar, entry) in result.bars.iter().enumerate() {
        let mut plus = lengths.clone();
        let mut minus = lengths.clone();
        plus[bar] += h;
        minus[bar] -= h;
        let f_plus = objective_at(&l, &plus, 4, desired);
        let f_minus = objective_at(&l, &minus, 4, desired);
        let numeric = (f_plus - f_minus) / (2.0 * h);
        assert!(
            (entry.gradient - numeric).abs() < 1e-5,
            "bar {bar}: dual {} vs numeric {numeric}",
            entry.gradient
        );
    }
}

#[test]
fn it_should_label_gradients_with_bar_endpoints() {
    let l = triangle();
    let result = edge_length_gradients(&l, 2, Vec2::new(1.0, 1.5)).unwrap();
    assert_eq!((result.bars[0].a, result.bars[0].b), (0, 2));
    assert_eq!((result.bars[1].a, result.bars[1].b), (1, 2));
    assert!((result.objective - 0.5).abs() < 1e-12);
    // Growing either arm of the symmetric triangle lifts the apex toward the target.
    assert!(result.bars[0].gradient < 0.0);
    assert!(result.bars[1].gradient < 0.0);
}

#[test]
fn it_should_ignore_bars_off_the_target_chain() {
    let l = coupler_four_bar();
    let result = edge_length_gradients(&l, 3, Vec2::new(3.0, 3.0)).unwrap();
    // B-E and C-E do not influence C.
    assert_eq!(result.bars[3].gradient, 0.0);
    assert_eq!(result.bars[4].gradient, 0.0);
}

#[test]
fn it_should_reject_unknown_targets() {
    let l = triangle();
    assert!(matches!(
        edge_length_gradients(&l, 9, Vec2::new(0.0, 0.0)),
        Err(LinkageError::JointOutOfRange { index: 9, .. })
    ));
}
