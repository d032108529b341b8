use super::kernel::{cutoff_gate, cutoff_gate_derivative, d0, similarity, similarity_derivative};
use super::sinkhorn::SinkhornTape;
use nalgebra::{DMatrix, Point3, Vector3};
use rayon::prelude::*;

/// Distances below this are treated as coincident and contribute no gradient.
const COINCIDENT_DISTANCE: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct SoftScore {
    pub score: f64,
    /// Soft assignment, rows are mobile residues and columns reference residues.
    pub assignment: DMatrix<f64>,
}

#[derive(Debug, Clone)]
pub struct ScoreGradient {
    pub score: f64,
    pub assignment: DMatrix<f64>,
    /// `d score / d x_i` for every transformed mobile coordinate.
    pub mobile_gradient: Vec<Vector3<f64>>,
}

/// Entropy-regularized soft correspondence between two coordinate sets.
///
/// Each pair gets the reward `s(d) * gate(d)`, where `s` is the TM-style
/// similarity with `d0` taken from the reference length and `gate` is a
/// sigmoid cutoff. The kernel `exp(sharpness * reward)` is pushed through
/// `sinkhorn_iterations` rounds of row/column normalization to give the
/// assignment `P`, and the score is `sum(P * reward) / reference_len`.
///
/// Callers must pass a non-empty reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftAlignmentScorer {
    pub cutoff: f64,
    pub steepness: f64,
    pub sharpness: f64,
    pub sinkhorn_iterations: usize,
}

struct PairTerms {
    reward: DMatrix<f64>,
    /// `d reward / d distance` for each pair.
    reward_slope: DMatrix<f64>,
}

impl SoftAlignmentScorer {
    pub fn reward_matrix(&self, mobile: &[Point3<f64>], reference: &[Point3<f64>]) -> DMatrix<f64> {
        self.pair_terms(mobile, reference, false).reward
    }

    pub fn score(&self, mobile: &[Point3<f64>], reference: &[Point3<f64>]) -> SoftScore {
        let reward = self.reward_matrix(mobile, reference);
        let tape = SinkhornTape::record(self.kernel(&reward), self.sinkhorn_iterations);
        let assignment = tape.into_output();
        SoftScore {
            score: assignment.dot(&reward) / reference.len() as f64,
            assignment,
        }
    }

    /// Scores the pair and differentiates the score with respect to every
    /// mobile coordinate, through the assignment normalization as well.
    pub fn score_with_gradient(
        &self,
        mobile: &[Point3<f64>],
        reference: &[Point3<f64>],
    ) -> ScoreGradient {
        let norm = reference.len() as f64;
        let terms = self.pair_terms(mobile, reference, true);
        let kernel = self.kernel(&terms.reward);
        let tape = SinkhornTape::record(kernel.clone(), self.sinkhorn_iterations);

        let score = tape.output().dot(&terms.reward) / norm;
        let grad_kernel = tape.backward(&(&terms.reward / norm));

        let assignment = tape.output();
        let mobile_gradient: Vec<Vector3<f64>> = mobile
            .par_iter()
            .enumerate()
            .map(|(i, x)| {
                let mut grad = Vector3::zeros();
                for (j, y) in reference.iter().enumerate() {
                    let diff = x - y;
                    let dist = diff.norm();
                    if dist < COINCIDENT_DISTANCE {
                        continue;
                    }
                    let grad_reward = assignment[(i, j)] / norm
                        + grad_kernel[(i, j)] * self.sharpness * kernel[(i, j)];
                    grad += diff * (grad_reward * terms.reward_slope[(i, j)] / dist);
                }
                grad
            })
            .collect();

        ScoreGradient {
            score,
            assignment: tape.into_output(),
            mobile_gradient,
        }
    }

    fn kernel(&self, reward: &DMatrix<f64>) -> DMatrix<f64> {
        reward.map(|r| (self.sharpness * r).exp())
    }

    fn pair_terms(
        &self,
        mobile: &[Point3<f64>],
        reference: &[Point3<f64>],
        with_slope: bool,
    ) -> PairTerms {
        let scale = d0(reference.len());
        let (rows, cols) = (mobile.len(), reference.len());

        // Column-major, matching `DMatrix::from_iterator`.
        let entries: Vec<(f64, f64)> = (0..rows * cols)
            .into_par_iter()
            .map(|k| {
                let dist = (mobile[k % rows] - reference[k / rows]).norm();
                let s = similarity(dist, scale);
                let g = cutoff_gate(dist, self.cutoff, self.steepness);
                let slope = if with_slope {
                    similarity_derivative(dist, scale) * g
                        + s * cutoff_gate_derivative(dist, self.cutoff, self.steepness)
                } else {
                    0.0
                };
                (s * g, slope)
            })
            .collect();

        let reward = DMatrix::from_iterator(rows, cols, entries.iter().map(|e| e.0));
        let reward_slope = if with_slope {
            DMatrix::from_iterator(rows, cols, entries.iter().map(|e| e.1))
        } else {
            DMatrix::zeros(0, cols)
        };
        PairTerms {
            reward,
            reward_slope,
        }
    }
}
