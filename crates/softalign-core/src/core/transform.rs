//! Rigid-body transforms and their unconstrained 6-parameter encoding.
//!
//! The rotation is obtained as the matrix exponential of the skew-symmetric
//! generator built from the first three parameters, which maps every real
//! 3-vector onto a proper rotation. The optimizer can therefore move freely in
//! `R^6` without orthogonality constraints.

use nalgebra::{Matrix3, Point3, Vector3, Vector6};

/// Below this generator norm the rotation Jacobian is replaced by its limit at
/// the identity, where the closed form divides by `|w|^2`.
const SMALL_ANGLE: f64 = 1e-9;

/// Unconstrained transform parameters `(w1, w2, w3, u1, u2, u3)`.
pub type TransformParams = Vector6<f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Builds `R = exp([w]x)` and `u` from a parameter vector.
    pub fn from_params(params: &TransformParams) -> Self {
        let (generator, translation) = split_params(params);
        Self {
            rotation: generator.cross_matrix().exp(),
            translation,
        }
    }

    /// Applies `R * p + u`.
    #[inline]
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * point.coords + self.translation)
    }

    pub fn apply_all(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        points.iter().map(|p| self.apply(p)).collect()
    }
}

pub fn split_params(params: &TransformParams) -> (Vector3<f64>, Vector3<f64>) {
    (
        Vector3::new(params[0], params[1], params[2]),
        Vector3::new(params[3], params[4], params[5]),
    )
}

/// Partial derivatives `dR/dw_k` of `R = exp([w]x)` for `k = 0, 1, 2`.
///
/// Uses the closed form
/// `dR/dw_k = (w_k [w]x + [w x ((I - R) e_k)]x) R / |w|^2`,
/// which reduces to `[e_k]x` as `w -> 0`.
pub fn rotation_jacobian(generator: &Vector3<f64>, rotation: &Matrix3<f64>) -> [Matrix3<f64>; 3] {
    let norm_sq = generator.norm_squared();
    let basis = |k: usize| Vector3::ith(k, 1.0);

    if norm_sq.sqrt() < SMALL_ANGLE {
        return std::array::from_fn(|k| basis(k).cross_matrix());
    }

    let w_cross = generator.cross_matrix();
    let i_minus_r = Matrix3::identity() - rotation;
    std::array::from_fn(|k| {
        let correction = generator.cross(&(i_minus_r * basis(k))).cross_matrix();
        (w_cross * generator[k] + correction) * rotation / norm_sq
    })
}
