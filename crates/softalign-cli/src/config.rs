mod defaults;

use crate::cli::AlignArgs;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use serde::Deserialize;
use softalign::engine::config::{AlignmentConfig, AlignmentConfigBuilder};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialScoringConfig {
    distance_cutoff: Option<f64>,
    cutoff_steepness: Option<f64>,
    sharpness: Option<f64>,
    sinkhorn_iterations: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialOptimizationConfig {
    steps: Option<usize>,
    learning_rate: Option<f64>,
    print_interval: Option<usize>,
    weight_decay: Option<f64>,
}

/// Configuration as read from an optional TOML file, before CLI flags and
/// built-in defaults are layered on top.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAlignConfig {
    scoring: Option<PartialScoringConfig>,
    optimization: Option<PartialOptimizationConfig>,
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: '{}'", key, value))
    })
}

impl PartialAlignConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves every parameter as CLI flag, then `--set`, then file, then default.
    pub fn merge_with_cli(mut self, args: &AlignArgs) -> Result<AlignmentConfig> {
        self.apply_set_values(&args.set_values)?;

        let defaults = DefaultsConfig::default();
        let scoring = self.scoring.take().unwrap_or_default();
        let optimization = self.optimization.take().unwrap_or_default();

        AlignmentConfigBuilder::new()
            .distance_cutoff(
                args.cutoff
                    .or(scoring.distance_cutoff)
                    .unwrap_or(defaults.distance_cutoff),
            )
            .cutoff_steepness(
                args.steepness
                    .or(scoring.cutoff_steepness)
                    .unwrap_or(defaults.cutoff_steepness),
            )
            .sharpness(args.gamma.or(scoring.sharpness).unwrap_or(defaults.sharpness))
            .sinkhorn_iterations(
                args.sinkhorn_iters
                    .or(scoring.sinkhorn_iterations)
                    .unwrap_or(defaults.sinkhorn_iterations),
            )
            .steps(args.steps.or(optimization.steps).unwrap_or(defaults.steps))
            .learning_rate(
                args.lr
                    .or(optimization.learning_rate)
                    .unwrap_or(defaults.learning_rate),
            )
            .print_interval(
                args.print_freq
                    .or(optimization.print_interval)
                    .unwrap_or(defaults.print_interval),
            )
            .weight_decay(optimization.weight_decay.unwrap_or(defaults.weight_decay))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();

            match key {
                "scoring.distance-cutoff" => {
                    self.scoring.get_or_insert_with(Default::default).distance_cutoff =
                        Some(parse_value(key, value)?);
                }
                "scoring.cutoff-steepness" => {
                    self.scoring.get_or_insert_with(Default::default).cutoff_steepness =
                        Some(parse_value(key, value)?);
                }
                "scoring.sharpness" => {
                    self.scoring.get_or_insert_with(Default::default).sharpness =
                        Some(parse_value(key, value)?);
                }
                "scoring.sinkhorn-iterations" => {
                    self.scoring.get_or_insert_with(Default::default).sinkhorn_iterations =
                        Some(parse_value(key, value)?);
                }
                "optimization.steps" => {
                    self.optimization.get_or_insert_with(Default::default).steps =
                        Some(parse_value(key, value)?);
                }
                "optimization.learning-rate" => {
                    self.optimization
                        .get_or_insert_with(Default::default)
                        .learning_rate = Some(parse_value(key, value)?);
                }
                "optimization.print-interval" => {
                    self.optimization
                        .get_or_insert_with(Default::default)
                        .print_interval = Some(parse_value(key, value)?);
                }
                "optimization.weight-decay" => {
                    self.optimization
                        .get_or_insert_with(Default::default)
                        .weight_decay = Some(parse_value(key, value)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
