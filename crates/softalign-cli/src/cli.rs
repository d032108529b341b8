use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Yue Hu",
    version,
    about = "SoftAlign CLI - Optimal rigid-body superposition of protein backbones through a differentiable, Sinkhorn-regularized TM-score.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Superpose a mobile structure onto a reference without a given residue correspondence.
    Align(AlignArgs),
}

/// Arguments for the `align` subcommand.
#[derive(Args, Debug)]
pub struct AlignArgs {
    // --- Core Arguments ---
    /// Path to the mobile PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub mobile: PathBuf,

    /// Path to the reference PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub reference: PathBuf,

    /// Path to save the superposed mobile structure (PDB).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// File to save the final transformation matrix.
    #[arg(long, value_name = "PATH")]
    pub matrix_out: Option<PathBuf>,

    /// Chain identifier to read from the mobile structure.
    #[arg(long, value_name = "CHAR")]
    pub mobile_chain: Option<char>,

    /// Chain identifier to read from the reference structure.
    #[arg(long, value_name = "CHAR")]
    pub reference_chain: Option<char>,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Optimization Overrides ---
    /// Number of optimization steps.
    #[arg(long, value_name = "INT")]
    pub steps: Option<usize>,

    /// Learning rate of the AdamW optimizer.
    #[arg(long, value_name = "FLOAT")]
    pub lr: Option<f64>,

    /// Print the soft score every this many steps.
    #[arg(long, value_name = "INT")]
    pub print_freq: Option<usize>,

    // --- Scoring Overrides ---
    /// Distance cutoff (Å) of the sigmoid gate.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Steepness of the sigmoid cutoff.
    #[arg(long, value_name = "FLOAT")]
    pub steepness: Option<f64>,

    /// Sharpness factor applied before Sinkhorn normalization.
    #[arg(long, value_name = "FLOAT")]
    pub gamma: Option<f64>,

    /// Number of Sinkhorn iterations.
    #[arg(long, value_name = "INT")]
    pub sinkhorn_iters: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S optimization.steps=2000
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
