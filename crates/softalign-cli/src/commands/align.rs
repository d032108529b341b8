use crate::cli::AlignArgs;
use crate::config::PartialAlignConfig;
use crate::error::{CliError, Result};
use crate::report;
use crate::utils::progress::CliProgressHandler;
use softalign::{
    core::io::{
        pdb::{PdbFile, PdbReadOptions},
        traits::StructureFile,
    },
    core::models::structure::Structure,
    engine::progress::ProgressReporter,
    workflows,
};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

fn load_structure(path: &Path, options: PdbReadOptions) -> Result<Structure> {
    PdbFile::read_from_path(path, &options).map_err(|source| CliError::Structure {
        path: path.to_path_buf(),
        source,
    })
}

pub fn run(args: AlignArgs) -> Result<()> {
    let started = Instant::now();

    let partial_config = match &args.config {
        Some(path) => PartialAlignConfig::from_file(path)?,
        None => PartialAlignConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;
    debug!("Resolved alignment configuration: {:?}", config);

    println!("{}", report::banner());

    info!("Loading alpha-carbons from {:?} and {:?}", &args.mobile, &args.reference);
    let mobile = load_structure(&args.mobile, PdbReadOptions::alpha_carbons(args.mobile_chain))?;
    let reference = load_structure(
        &args.reference,
        PdbReadOptions::alpha_carbons(args.reference_chain),
    )?;

    println!(
        "{}",
        report::chain_summary(
            &args.mobile,
            args.mobile_chain,
            mobile.len(),
            &args.reference,
            args.reference_chain,
            reference.len(),
        )
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("{}", report::SEARCH_HEADER);
    info!("Invoking the core alignment workflow...");
    let result = workflows::align::run(&mobile, &reference, &config, &reporter)?;
    info!(
        "Workflow finished with {} aligned pairs and final score {:.4}.",
        result.alignment.len(),
        result.final_score
    );
    println!("{}\n", report::SEARCH_FOOTER);

    println!("{}", report::ANALYSIS_HEADER);
    for line in report::analysis_lines(&result, mobile.len(), reference.len()) {
        println!("{}", line);
    }

    println!("\n{}", report::PAIRS_HEADER);
    for line in report::aligned_pair_lines(&result.alignment) {
        println!("{}", line);
    }

    if let Some(output) = &args.output {
        println!("\n--- Generating Final Aligned Structure ---");
        let full_mobile = load_structure(&args.mobile, PdbReadOptions::all_atoms(args.mobile_chain))?;
        let placed = result.superpose(&full_mobile);
        info!("Writing superposed mobile structure to {:?}", output);
        println!("Writing aligned mobile protein to '{}'...", output.display());
        PdbFile::write_to_path(&placed, output).map_err(|source| CliError::StructureWrite {
            path: output.clone(),
            source,
        })?;
        println!(
            "Success! You can now load '{}' and '{}' into a viewer.",
            args.reference.display(),
            output.display()
        );
    }

    if let Some(matrix_out) = &args.matrix_out {
        println!("\n--- Saving Transformation Matrix ---");
        let mobile_name = report::display_name(&args.mobile);
        let reference_name = report::display_name(&args.reference);
        result
            .matrix_report(&mobile_name, &reference_name)
            .write_to_path(matrix_out)?;
        println!("✓ Transformation matrix saved to '{}'", matrix_out.display());
    }

    println!(
        "\nTotal execution time: {}",
        report::elapsed(started.elapsed())
    );
    Ok(())
}
