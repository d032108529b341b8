use crate::core::models::alignment::{AlignedPair, Alignment};
use nalgebra::DMatrix;
use tracing::debug;

/// Turns a soft assignment (mobile rows, reference columns) into a discrete
/// one-to-one alignment.
pub trait CorrespondenceDecoder {
    fn decode(&self, assignment: &DMatrix<f64>) -> Alignment;
}

/// Greedy row-wise decoding.
///
/// Every mobile row proposes its highest-weight column (first one on ties).
/// Proposals are accepted in order of decreasing weight, rows with equal
/// weight in ascending order; a row whose column is already taken stays
/// unmatched. This approximates, but does not solve, the optimal bipartite
/// matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyDecoder;

impl CorrespondenceDecoder for GreedyDecoder {
    fn decode(&self, assignment: &DMatrix<f64>) -> Alignment {
        let mut candidates: Vec<(usize, usize, f64)> = assignment
            .row_iter()
            .enumerate()
            .filter_map(|(row, values)| {
                let mut best: Option<(usize, f64)> = None;
                for (col, &value) in values.iter().enumerate() {
                    if best.is_none_or(|(_, top)| value > top) {
                        best = Some((col, value));
                    }
                }
                best.map(|(col, value)| (row, col, value))
            })
            .collect();
        candidates.sort_by(|a, b| b.2.total_cmp(&a.2));

        let mut used = vec![false; assignment.ncols()];
        let mut pairs = Vec::with_capacity(candidates.len());
        for (row, col, _) in candidates {
            if !used[col] {
                used[col] = true;
                pairs.push(AlignedPair {
                    mobile: row,
                    reference: col,
                });
            }
        }

        debug!(
            "Greedy decoding kept {} of {} mobile rows.",
            pairs.len(),
            assignment.nrows()
        );
        Alignment::from_pairs(pairs)
    }
}
