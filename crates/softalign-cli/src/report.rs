//! Text of the run log printed on stdout.
//!
//! Downstream log comparison tools match several of these lines verbatim, so
//! wording, spacing and numeric precision are fixed.

use softalign::core::models::alignment::Alignment;
use softalign::workflows::align::AlignmentResult;
use std::path::Path;
use std::time::Duration;

const PAIRS_PER_LINE: usize = 6;
const BANNER_WIDTH: usize = 74;

pub const SEARCH_HEADER: &str =
    "--- Finding Optimal Superposition (Sinkhorn Differentiable TM-score) ---";
pub const SEARCH_FOOTER: &str = "--- Global Search Finished ---";
pub const ANALYSIS_HEADER: &str = "--- Alignment Analysis ---";
pub const PAIRS_HEADER: &str = "--- Aligned Pairs (mobile, reference) ---";

pub fn banner() -> String {
    let border = "*".repeat(BANNER_WIDTH);
    let title = format!("softalign v{}", env!("CARGO_PKG_VERSION"));
    let body = [
        title.as_str(),
        "Optimal superposition of protein structures",
        "Differentiable TM-score with Sinkhorn soft correspondences",
    ]
    .iter()
    .map(|text| format!("*{:^width$}*", text, width = BANNER_WIDTH - 2))
    .collect::<Vec<_>>()
    .join("\n");
    format!("\n{}\n{}\n{}\n", border, body, border)
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

fn chain_label(chain: Option<char>) -> String {
    chain.map_or_else(|| "All".to_string(), |c| c.to_string())
}

pub fn chain_summary(
    mobile: &Path,
    mobile_chain: Option<char>,
    mobile_len: usize,
    reference: &Path,
    reference_chain: Option<char>,
    reference_len: usize,
) -> String {
    format!(
        "Name of Chain_1: {} (chain {})\n\
         Name of Chain_2: {} (chain {})\n\
         Length of Chain_1: {} residues\n\
         Length of Chain_2: {} residues\n",
        display_name(mobile),
        chain_label(mobile_chain),
        display_name(reference),
        chain_label(reference_chain),
        mobile_len,
        reference_len
    )
}

pub fn step_line(step: usize, score: f64) -> String {
    format!("Step {:05}: Sinkhorn Score = {:.4}", step, score)
}

pub fn analysis_lines(
    result: &AlignmentResult,
    mobile_len: usize,
    reference_len: usize,
) -> Vec<String> {
    let aligned = result.alignment.len();
    let mut lines = vec![format!(
        "Found {} residue pairs from the optimized alignment matrix.",
        aligned
    )];
    if let Some(metrics) = &result.metrics {
        lines.push(format!(
            "Kabsch RMSD for the {} aligned pairs = {:.2} Å",
            aligned, metrics.kabsch_rmsd
        ));
        lines.push(format!(
            "Standard TM-score (normalized by reference, L={}) = {:.5}",
            reference_len, metrics.tm_score_reference
        ));
        lines.push(format!(
            "Standard TM-score (normalized by mobile,   L={}) = {:.5}",
            mobile_len, metrics.tm_score_mobile
        ));
        lines.push(format!(
            "Sequence identity in aligned region = {:.3}",
            metrics.sequence_identity
        ));
    }
    lines
}

pub fn aligned_pair_lines(alignment: &Alignment) -> Vec<String> {
    alignment
        .pairs()
        .chunks(PAIRS_PER_LINE)
        .map(|chunk| {
            chunk
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// `H:MM:SS.ffffff`
pub fn elapsed(duration: Duration) -> String {
    let total = duration.as_secs();
    format!(
        "{}:{:02}:{:02}.{:06}",
        total / 3600,
        (total / 60) % 60,
        total % 60,
        duration.subsec_micros()
    )
}
