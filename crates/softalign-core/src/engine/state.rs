use crate::core::transform::{RigidTransform, TransformParams};
use nalgebra::DMatrix;

/// Final state of an optimization run.
///
/// `score` and `assignment` belong to the last evaluated step, which precedes
/// the last parameter update; `params` and `transform` include that update.
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    pub params: TransformParams,
    pub transform: RigidTransform,
    pub score: f64,
    pub assignment: DMatrix<f64>,
    pub steps: usize,
}
