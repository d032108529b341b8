use crate::core::kabsch::{self, KabschError};
use crate::core::models::alignment::Alignment;
use crate::core::scoring::kernel::d0;
use crate::core::transform::RigidTransform;
use crate::core::utils::geometry::{calculate_rmsd, gather, squared_distances};
use nalgebra::Point3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentMetrics {
    pub aligned_length: usize,
    pub kabsch_rmsd: f64,
    pub tm_score_reference: f64,
    pub tm_score_mobile: f64,
    pub sequence_identity: f64,
}

/// `sum(1 / (1 + d^2 / d0(L)^2)) / L` over the given squared distances.
pub fn tm_score(squared_distances: &[f64], length: usize) -> f64 {
    if length == 0 {
        return 0.0;
    }
    let scale_sq = d0(length).powi(2);
    let total: f64 = squared_distances
        .iter()
        .map(|d2| 1.0 / (1.0 + d2 / scale_sq))
        .sum();
    total / length as f64
}

/// Fraction of aligned pairs whose one-letter codes match.
pub fn sequence_identity(alignment: &Alignment, mobile: &[char], reference: &[char]) -> f64 {
    if alignment.is_empty() {
        return 0.0;
    }
    let identical = alignment
        .pairs()
        .iter()
        .filter(|p| mobile[p.mobile] == reference[p.reference])
        .count();
    identical as f64 / alignment.len() as f64
}

/// Kabsch refit on the aligned subsets and the RMSD it achieves.
pub fn kabsch_refit(
    alignment: &Alignment,
    mobile: &[Point3<f64>],
    reference: &[Point3<f64>],
) -> Result<(RigidTransform, f64), KabschError> {
    let a = gather(mobile, &alignment.mobile_indices());
    let b = gather(reference, &alignment.reference_indices());
    let fit = kabsch::superpose(&a, &b)?;
    let rmsd = calculate_rmsd(&fit.apply_all(&a), &b).ok_or(KabschError::Empty)?;
    Ok((fit, rmsd))
}

/// Everything reported about a decoded alignment.
///
/// `superposed_mobile` must already carry the optimizer's transform: TM-scores
/// are measured there, while the RMSD comes from an independent Kabsch refit of
/// the untransformed `mobile` coordinates.
pub struct MetricsInput<'a> {
    pub alignment: &'a Alignment,
    pub mobile: &'a [Point3<f64>],
    pub superposed_mobile: &'a [Point3<f64>],
    pub reference: &'a [Point3<f64>],
    pub mobile_sequence: &'a [char],
    pub reference_sequence: &'a [char],
}

impl AlignmentMetrics {
    pub fn compute(input: &MetricsInput) -> Result<(Self, RigidTransform), KabschError> {
        let alignment = input.alignment;
        let (fit, kabsch_rmsd) = kabsch_refit(alignment, input.mobile, input.reference)?;

        let superposed = gather(input.superposed_mobile, &alignment.mobile_indices());
        let targets = gather(input.reference, &alignment.reference_indices());
        let distances = squared_distances(&superposed, &targets);

        let metrics = Self {
            aligned_length: alignment.len(),
            kabsch_rmsd,
            tm_score_reference: tm_score(&distances, input.reference.len()),
            tm_score_mobile: tm_score(&distances, input.mobile.len()),
            sequence_identity: sequence_identity(
                alignment,
                input.mobile_sequence,
                input.reference_sequence,
            ),
        };
        Ok((metrics, fit))
    }
}
