//! Triangulation of a dynamic joint from two known joints.

use crate::math::{Scalar, Vec2};

/// Position of `k` in triangle `i, j, k`, given `|ik|` and `|jk|`.
///
/// Law of cosines for the angle at `i`, then the unit vector `i -> j` is rotated by that
/// angle and scaled to `|ik|`. `i -> j -> k` is assumed counter-clockwise. Infeasible
/// lengths (or `i == j`) produce non-finite output.
pub(crate) fn triangulate<S: Scalar>(i: &Vec2<S>, j: &Vec2<S>, dist_ik: S, dist_jk: S) -> Vec2<S> {
    let ij = j.clone() - i.clone();
    let dist_ij = ij.norm();
    let cos_phi = (dist_ij.clone() * dist_ij.clone() + dist_ik.clone() * dist_ik.clone()
        - dist_jk.clone() * dist_jk)
        / (S::constant(2.0) * dist_ij.clone() * dist_ik.clone());
    let phi = cos_phi.acos();
    ij.scale(dist_ik / dist_ij).rotate(phi) + i.clone()
}

/// Standalone triangle solve on plain numbers.
pub fn solve_triangle(i: Vec2, j: Vec2, dist_ik: f64, dist_jk: f64) -> Vec2 {
    triangulate(&i, &j, dist_ik, dist_jk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reproduces_right_isoceles_apex() {
        let k = solve_triangle(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            2f64.sqrt(),
            2f64.sqrt(),
        );
        assert!((k.x - 1.0).abs() < 1e-12);
        assert!((k.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn apex_lies_left_of_i_to_j() {
        let k = solve_triangle(Vec2::new(2.0, 0.0), Vec2::new(0.0, 0.0), 1.5, 1.5);
        assert!(k.y < 0.0);
    }

    #[test]
    fn violated_triangle_inequality_is_not_finite() {
        let k = solve_triangle(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 1.0, 1.0);
        assert!(!k.is_finite());
    }

    #[test]
    fn coincident_dependencies_are_not_finite() {
        let k = solve_triangle(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0), 1.0, 1.0);
        assert!(!k.is_finite());
    }
}
