use crate::core::transform::RigidTransform;
use crate::core::utils::geometry::{center_on, centroid};
use nalgebra::{Matrix3, Point3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KabschError {
    #[error("Point sets differ in size ({mobile} vs {reference})")]
    LengthMismatch { mobile: usize, reference: usize },
    #[error("Cannot fit empty point sets")]
    Empty,
    #[error("Singular value decomposition did not produce {0}")]
    Decomposition(&'static str),
}

/// Least-squares optimal proper rigid transform mapping `mobile` onto `reference`.
///
/// Both slices must be index-aligned. For degenerate inputs (collinear or
/// coincident points) the rotation is whatever the decomposition returns.
pub fn superpose(
    mobile: &[Point3<f64>],
    reference: &[Point3<f64>],
) -> Result<RigidTransform, KabschError> {
    if mobile.len() != reference.len() {
        return Err(KabschError::LengthMismatch {
            mobile: mobile.len(),
            reference: reference.len(),
        });
    }
    let (Some(center_a), Some(center_b)) = (centroid(mobile), centroid(reference)) else {
        return Err(KabschError::Empty);
    };

    let a = center_on(mobile, &center_a);
    let b = center_on(reference, &center_b);
    let mut h = Matrix3::zeros();
    for (pa, pb) in a.iter().zip(&b) {
        h += pa.coords * pb.coords.transpose();
    }

    let svd = h.svd(true, true);
    let u = svd.u.ok_or(KabschError::Decomposition("U"))?;
    let mut v = svd
        .v_t
        .ok_or(KabschError::Decomposition("V^T"))?
        .transpose();

    let mut rotation = v * u.transpose();
    if rotation.determinant() < 0.0 {
        v.column_mut(2).neg_mut();
        rotation = v * u.transpose();
    }

    let translation = center_b.coords - rotation * center_a.coords;
    Ok(RigidTransform {
        rotation,
        translation,
    })
}
