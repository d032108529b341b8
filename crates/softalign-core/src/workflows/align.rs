use crate::core::io::matrix::TransformationReport;
use crate::core::metrics::{AlignmentMetrics, MetricsInput};
use crate::core::models::alignment::Alignment;
use crate::core::models::structure::Structure;
use crate::core::transform::{RigidTransform, TransformParams};
use crate::core::utils::geometry::center_on;
use crate::engine::config::AlignmentConfig;
use crate::engine::decoder::{CorrespondenceDecoder, GreedyDecoder};
use crate::engine::error::EngineError;
use crate::engine::objective::SoftAlignmentObjective;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks;
use nalgebra::{DMatrix, Point3};
use tracing::{info, instrument, warn};

/// Everything produced by one alignment run.
///
/// `transform` is the optimizer's result and acts on mobile coordinates
/// centered at `mobile_centroid`, landing in the reference frame centered at
/// `reference_centroid`. `kabsch_transform` is the independent least-squares
/// refit over the decoded pairs in the same centered frames; it only backs the
/// reported RMSD and is absent when nothing was aligned.
#[derive(Debug, Clone)]
pub struct AlignmentResult {
    pub params: TransformParams,
    pub transform: RigidTransform,
    pub mobile_centroid: Point3<f64>,
    pub reference_centroid: Point3<f64>,
    pub final_score: f64,
    pub assignment: DMatrix<f64>,
    pub alignment: Alignment,
    pub kabsch_transform: Option<RigidTransform>,
    pub metrics: Option<AlignmentMetrics>,
    pub steps: usize,
}

impl AlignmentResult {
    /// Places any structure given in the mobile's original frame into the
    /// reference's original frame: `R * (x - c_mobile) + u + c_reference`.
    ///
    /// The mobile alpha-carbon centroid is used for every atom, so a full-atom
    /// reload lands exactly where the optimized alpha-carbons did.
    pub fn superpose(&self, structure: &Structure) -> Structure {
        structure.map_positions(|p| {
            let centered = Point3::from(p - self.mobile_centroid);
            self.transform.apply(&centered) + self.reference_centroid.coords
        })
    }

    /// The same mapping as [`AlignmentResult::superpose`] as a single rigid
    /// transform on uncentered coordinates.
    pub fn full_frame_transform(&self) -> RigidTransform {
        let rotation = self.transform.rotation;
        RigidTransform {
            rotation,
            translation: self.transform.translation + self.reference_centroid.coords
                - rotation * self.mobile_centroid.coords,
        }
    }

    pub fn matrix_report<'a>(
        &'a self,
        mobile_name: &'a str,
        reference_name: &'a str,
    ) -> TransformationReport<'a> {
        TransformationReport {
            mobile_name,
            reference_name,
            transform: &self.transform,
            mobile_centroid: &self.mobile_centroid,
            reference_centroid: &self.reference_centroid,
        }
    }
}

/// Aligns `mobile` onto `reference` with greedy correspondence decoding.
///
/// Both structures are expected to hold one alpha-carbon per residue.
pub fn run(
    mobile: &Structure,
    reference: &Structure,
    config: &AlignmentConfig,
    reporter: &ProgressReporter,
) -> Result<AlignmentResult, EngineError> {
    run_with_decoder(mobile, reference, config, &GreedyDecoder, reporter)
}

#[instrument(
    skip_all,
    name = "alignment_workflow",
    fields(mobile_len = mobile.len(), reference_len = reference.len())
)]
pub fn run_with_decoder<D>(
    mobile: &Structure,
    reference: &Structure,
    config: &AlignmentConfig,
    decoder: &D,
    reporter: &ProgressReporter,
) -> Result<AlignmentResult, EngineError>
where
    D: CorrespondenceDecoder + ?Sized,
{
    config.validate()?;

    // === Phase 1: Centering ===
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let mobile_centroid = mobile
        .centroid()
        .ok_or(EngineError::EmptyStructure { role: "mobile" })?;
    let reference_centroid = reference
        .centroid()
        .ok_or(EngineError::EmptyStructure { role: "reference" })?;
    let mobile_coords = center_on(&mobile.coordinates(), &mobile_centroid);
    let reference_coords = center_on(&reference.coordinates(), &reference_centroid);
    info!(
        mobile_len = mobile.len(),
        reference_len = reference.len(),
        "Centered both structures on their alpha-carbon centroids."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Differentiable transform search ===
    reporter.report(Progress::PhaseStart {
        name: "Transform Search",
    });
    let objective =
        SoftAlignmentObjective::new(&mobile_coords, &reference_coords, config.scoring.scorer());
    let outcome = tasks::transform_search::run(&objective, &config.optimization, reporter)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Decoding and metrics ===
    reporter.report(Progress::PhaseStart {
        name: "Alignment Analysis",
    });
    let alignment = decoder.decode(&outcome.assignment);
    info!("Decoded {} residue pairs.", alignment.len());

    let (metrics, kabsch_transform) = if alignment.is_empty() {
        warn!("No residue pairs could be decoded; skipping metrics.");
        reporter.report(Progress::Message(
            "No residue pairs could be decoded; RMSD, TM-scores and identity are not reported."
                .to_string(),
        ));
        (None, None)
    } else {
        let superposed = outcome.transform.apply_all(&mobile_coords);
        let mobile_sequence: Vec<char> = mobile.sequence().chars().collect();
        let reference_sequence: Vec<char> = reference.sequence().chars().collect();
        let (metrics, fit) = AlignmentMetrics::compute(&MetricsInput {
            alignment: &alignment,
            mobile: &mobile_coords,
            superposed_mobile: &superposed,
            reference: &reference_coords,
            mobile_sequence: &mobile_sequence,
            reference_sequence: &reference_sequence,
        })?;
        info!(
            rmsd = metrics.kabsch_rmsd,
            tm_score = metrics.tm_score_reference,
            "Computed alignment metrics."
        );
        (Some(metrics), Some(fit))
    };
    reporter.report(Progress::PhaseFinish);

    Ok(AlignmentResult {
        params: outcome.params,
        transform: outcome.transform,
        mobile_centroid,
        reference_centroid,
        final_score: outcome.score,
        assignment: outcome.assignment,
        alignment,
        kabsch_transform,
        metrics,
        steps: outcome.steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::{PdbFile, PdbReadOptions};
    use crate::core::io::traits::StructureFile;
    use crate::engine::config::{AlignmentConfigBuilder, ConfigError};
    use nalgebra::{Matrix3, Vector3};
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    const RESIDUES: [&str; 8] = ["ALA", "GLY", "SER", "LEU", "LYS", "GLU", "VAL", "PHE"];
    const CHAIN_LEN: usize = 30;

    fn coil(n: usize) -> Vec<Point3<f64>> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                Point3::new(
                    2.3 * (1.745 * t).cos() + 0.8 * (0.31 * t).sin(),
                    2.3 * (1.745 * t).sin() + 0.5 * (0.23 * t).cos(),
                    1.5 * t + 0.7 * (0.5 * t).sin(),
                )
            })
            .collect()
    }

    fn atom_line(serial: usize, name: &str, residue: usize, p: &Point3<f64>) -> String {
        format!(
            "ATOM  {:>5} {:<4} {:>3} A{:>4}    {:8.3}{:8.3}{:8.3}  1.00  0.00           {}",
            serial,
            name,
            RESIDUES[residue % RESIDUES.len()],
            residue + 1,
            p.x,
            p.y,
            p.z,
            &name.trim()[..1]
        )
    }

    /// Backbone N, CA and C per residue, moved by `place`.
    fn pdb_text<F: Fn(&Point3<f64>) -> Point3<f64>>(place: F) -> String {
        let mut text = String::from("HEADER    SYNTHETIC COIL\n");
        let mut serial = 1;
        for (i, ca) in coil(CHAIN_LEN).iter().enumerate() {
            let n = ca + Vector3::new(-0.5, 1.2, -0.6);
            let c = ca + Vector3::new(1.1, 0.4, 0.7);
            for (name, p) in [(" N", n), (" CA", *ca), (" C", c)] {
                text.push_str(&atom_line(serial, name, i, &place(&p)));
                text.push('\n');
                serial += 1;
            }
        }
        text.push_str("END\n");
        text
    }

    fn load(text: &str, options: PdbReadOptions) -> Structure {
        PdbFile::read_from(&mut Cursor::new(text), &options).unwrap()
    }

    fn config(steps: usize) -> AlignmentConfig {
        AlignmentConfigBuilder::new()
            .distance_cutoff(7.0)
            .cutoff_steepness(2.0)
            .sharpness(20.0)
            .sinkhorn_iterations(10)
            .steps(steps)
            .learning_rate(0.01)
            .print_interval(100)
            .build()
            .unwrap()
    }

    fn identity_pairs(alignment: &Alignment) -> bool {
        alignment
            .pairs()
            .iter()
            .enumerate()
            .all(|(i, p)| p.mobile == i && p.reference == i)
    }

    #[test]
    fn identical_structures_align_perfectly() {
        let text = pdb_text(|p| *p);
        let structure = load(&text, PdbReadOptions::alpha_carbons(None));
        assert_eq!(structure.len(), CHAIN_LEN);

        let result = run(&structure, &structure, &config(200), &ProgressReporter::new()).unwrap();
        let metrics = result.metrics.unwrap();

        assert_eq!(result.alignment.len(), CHAIN_LEN);
        assert!(identity_pairs(&result.alignment));
        assert!(metrics.kabsch_rmsd < 1e-3);
        assert!(metrics.tm_score_reference > 0.99);
        assert!(metrics.tm_score_mobile > 0.99);
        assert_eq!(metrics.sequence_identity, 1.0);
        assert!((result.transform.rotation - Matrix3::identity()).amax() < 1e-2);
    }

    #[test]
    fn rigidly_moved_copy_recovers_inverse_transform() {
        let known = RigidTransform::from_params(&TransformParams::new(0.3, -0.4, 0.2, 3.0, -2.0, 5.0));
        let reference_text = pdb_text(|p| *p);
        let mobile_text = pdb_text(|p| known.apply(p));

        let reference = load(&reference_text, PdbReadOptions::alpha_carbons(None));
        let mobile = load(&mobile_text, PdbReadOptions::alpha_carbons(None));
        let result = run(&mobile, &reference, &config(400), &ProgressReporter::new()).unwrap();

        assert_eq!(result.alignment.len(), CHAIN_LEN);
        assert!(identity_pairs(&result.alignment));

        let inverse_rotation = known.rotation.transpose();
        let inverse_translation = -(inverse_rotation * known.translation);
        let recovered = result.full_frame_transform();
        assert!((result.transform.rotation - inverse_rotation).amax() < 1e-2);
        assert!(result.transform.translation.amax() < 5e-2);
        assert!((recovered.translation - inverse_translation).amax() < 5e-2);

        let metrics = result.metrics.unwrap();
        assert!(metrics.kabsch_rmsd < 1e-2);
        assert!(metrics.tm_score_reference > 0.99);
    }

    #[test]
    fn superposed_full_atom_structure_lands_on_reference() {
        let known = RigidTransform::from_params(&TransformParams::new(0.3, -0.4, 0.2, 3.0, -2.0, 5.0));
        let reference_text = pdb_text(|p| *p);
        let mobile_text = pdb_text(|p| known.apply(p));
        let reference = load(&reference_text, PdbReadOptions::alpha_carbons(None));
        let mobile = load(&mobile_text, PdbReadOptions::alpha_carbons(None));
        let result = run(&mobile, &reference, &config(400), &ProgressReporter::new()).unwrap();

        let full_mobile = load(&mobile_text, PdbReadOptions::all_atoms(None));
        let full_reference = load(&reference_text, PdbReadOptions::all_atoms(None));
        let placed = result.superpose(&full_mobile);
        assert_eq!(placed.len(), 3 * CHAIN_LEN);
        for (a, b) in placed.records().iter().zip(full_reference.records()) {
            assert!((a.position - b.position).norm() < 0.05);
            assert_eq!(a.atom_name, b.atom_name);
        }

        let mut out = Vec::new();
        PdbFile::write_to(&placed, &mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        for (line, original) in written.lines().zip(full_mobile.raw_lines()) {
            assert_eq!(&line[..30], &original[..30]);
            assert_eq!(&line[54..], &original[54..]);
        }
    }

    #[test]
    fn identity_result_rewrites_structure_unchanged() {
        let text = pdb_text(|p| *p);
        let structure = load(&text, PdbReadOptions::alpha_carbons(None));
        let full = load(&text, PdbReadOptions::all_atoms(None));
        let centroid = structure.centroid().unwrap();
        let result = AlignmentResult {
            params: TransformParams::zeros(),
            transform: RigidTransform::identity(),
            mobile_centroid: centroid,
            reference_centroid: centroid,
            final_score: 0.0,
            assignment: DMatrix::zeros(0, 0),
            alignment: Alignment::default(),
            kabsch_transform: None,
            metrics: None,
            steps: 0,
        };

        let mut out = Vec::new();
        PdbFile::write_to(&result.superpose(&full), &mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert_eq!(written.lines().collect::<Vec<_>>(), full.raw_lines().collect::<Vec<_>>());
    }

    #[test]
    fn matrix_report_uses_optimizer_transform_and_centroids() {
        let text = pdb_text(|p| *p);
        let structure = load(&text, PdbReadOptions::alpha_carbons(None));
        let result = run(&structure, &structure, &config(5), &ProgressReporter::new()).unwrap();

        let mut out = Vec::new();
        result
            .matrix_report("mobile.pdb", "reference.pdb")
            .write_to(&mut out)
            .unwrap();
        let report = String::from_utf8(out).unwrap();
        let c = result.mobile_centroid;
        assert!(report.contains(&format!("# Mobile centroid:    {:.8}, {:.8}, {:.8}", c.x, c.y, c.z)));
        assert!(report.contains("mobile.pdb -> reference.pdb"));
    }

    #[test]
    fn empty_structure_is_rejected() {
        let text = pdb_text(|p| *p);
        let structure = load(&text, PdbReadOptions::alpha_carbons(None));
        let result = run(
            &Structure::default(),
            &structure,
            &config(5),
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(EngineError::EmptyStructure { role: "mobile" })
        ));
    }

    #[test]
    fn invalid_configuration_is_rejected_before_optimizing() {
        let text = pdb_text(|p| *p);
        let structure = load(&text, PdbReadOptions::alpha_carbons(None));
        let mut bad = config(5);
        bad.optimization.learning_rate = -1.0;
        let result = run(&structure, &structure, &bad, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(EngineError::Config(ConfigError::InvalidParameter {
                name: "learning_rate",
                ..
            }))
        ));
    }

    struct NothingDecoder;

    impl CorrespondenceDecoder for NothingDecoder {
        fn decode(&self, _: &DMatrix<f64>) -> Alignment {
            Alignment::default()
        }
    }

    #[test]
    fn custom_decoder_without_pairs_skips_metrics() {
        let text = pdb_text(|p| *p);
        let structure = load(&text, PdbReadOptions::alpha_carbons(None));
        let messages = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Message(msg) = event {
                messages.lock().unwrap().push(msg);
            }
        }));
        let result = run_with_decoder(
            &structure,
            &structure,
            &config(5),
            &NothingDecoder,
            &reporter,
        )
        .unwrap();
        drop(reporter);
        let messages = messages.into_inner().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("No residue pairs could be decoded"));
        assert!(result.alignment.is_empty());
        assert!(result.metrics.is_none());
        assert!(result.kabsch_transform.is_none());
        assert_eq!(result.steps, 5);
    }

    /// Records the name of every span opened while it is the default subscriber.
    struct SpanNames(Arc<Mutex<Vec<&'static str>>>);

    impl tracing::Subscriber for SpanNames {
        fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, span: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            let mut names = self.0.lock().unwrap();
            names.push(span.metadata().name());
            tracing::span::Id::from_u64(names.len() as u64)
        }

        fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}

        fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}

        fn event(&self, _: &tracing::Event<'_>) {}

        fn enter(&self, _: &tracing::span::Id) {}

        fn exit(&self, _: &tracing::span::Id) {}
    }

    #[test]
    fn custom_decoder_runs_inside_the_workflow_span() {
        let text = pdb_text(|p| *p);
        let structure = load(&text, PdbReadOptions::alpha_carbons(None));
        let names = Arc::new(Mutex::new(Vec::new()));

        tracing::subscriber::with_default(SpanNames(names.clone()), || {
            run_with_decoder(
                &structure,
                &structure,
                &config(3),
                &NothingDecoder,
                &ProgressReporter::new(),
            )
            .unwrap();
        });

        let names = names.lock().unwrap();
        assert_eq!(names.first(), Some(&"alignment_workflow"));
        assert!(names.contains(&"transform_search_task"));
    }
}
