use crate::core::scoring::soft::SoftAlignmentScorer;
use thiserror::Error;

pub const DEFAULT_BETA1: f64 = 0.9;
pub const DEFAULT_BETA2: f64 = 0.999;
pub const DEFAULT_EPSILON: f64 = 1e-8;
pub const DEFAULT_WEIGHT_DECAY: f64 = 0.01;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub distance_cutoff: f64,
    pub cutoff_steepness: f64,
    pub sharpness: f64,
    pub sinkhorn_iterations: usize,
}

impl ScoringConfig {
    pub fn scorer(&self) -> SoftAlignmentScorer {
        SoftAlignmentScorer {
            cutoff: self.distance_cutoff,
            steepness: self.cutoff_steepness,
            sharpness: self.sharpness,
            sinkhorn_iterations: self.sinkhorn_iterations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationConfig {
    pub steps: usize,
    pub learning_rate: f64,
    pub print_interval: usize,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    pub weight_decay: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentConfig {
    pub scoring: ScoringConfig,
    pub optimization: OptimizationConfig,
}

#[derive(Default)]
pub struct AlignmentConfigBuilder {
    distance_cutoff: Option<f64>,
    cutoff_steepness: Option<f64>,
    sharpness: Option<f64>,
    sinkhorn_iterations: Option<usize>,
    steps: Option<usize>,
    learning_rate: Option<f64>,
    print_interval: Option<usize>,
    weight_decay: Option<f64>,
}

impl AlignmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distance_cutoff(mut self, cutoff: f64) -> Self {
        self.distance_cutoff = Some(cutoff);
        self
    }
    pub fn cutoff_steepness(mut self, steepness: f64) -> Self {
        self.cutoff_steepness = Some(steepness);
        self
    }
    pub fn sharpness(mut self, gamma: f64) -> Self {
        self.sharpness = Some(gamma);
        self
    }
    pub fn sinkhorn_iterations(mut self, iterations: usize) -> Self {
        self.sinkhorn_iterations = Some(iterations);
        self
    }
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }
    pub fn learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = Some(lr);
        self
    }
    pub fn print_interval(mut self, interval: usize) -> Self {
        self.print_interval = Some(interval);
        self
    }
    pub fn weight_decay(mut self, decay: f64) -> Self {
        self.weight_decay = Some(decay);
        self
    }

    pub fn build(self) -> Result<AlignmentConfig, ConfigError> {
        let scoring = ScoringConfig {
            distance_cutoff: self
                .distance_cutoff
                .ok_or(ConfigError::MissingParameter("distance_cutoff"))?,
            cutoff_steepness: self
                .cutoff_steepness
                .ok_or(ConfigError::MissingParameter("cutoff_steepness"))?,
            sharpness: self
                .sharpness
                .ok_or(ConfigError::MissingParameter("sharpness"))?,
            sinkhorn_iterations: self
                .sinkhorn_iterations
                .ok_or(ConfigError::MissingParameter("sinkhorn_iterations"))?,
        };
        let optimization = OptimizationConfig {
            steps: self.steps.ok_or(ConfigError::MissingParameter("steps"))?,
            learning_rate: self
                .learning_rate
                .ok_or(ConfigError::MissingParameter("learning_rate"))?,
            print_interval: self
                .print_interval
                .ok_or(ConfigError::MissingParameter("print_interval"))?,
            beta1: DEFAULT_BETA1,
            beta2: DEFAULT_BETA2,
            epsilon: DEFAULT_EPSILON,
            weight_decay: self.weight_decay.unwrap_or(DEFAULT_WEIGHT_DECAY),
        };
        let config = AlignmentConfig {
            scoring,
            optimization,
        };
        config.validate()?;
        Ok(config)
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

impl AlignmentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scoring;
        let o = &self.optimization;
        if !(s.distance_cutoff.is_finite() && s.distance_cutoff > 0.0) {
            return Err(invalid("distance_cutoff", "must be a positive number"));
        }
        if !(s.cutoff_steepness.is_finite() && s.cutoff_steepness >= 0.0) {
            return Err(invalid("cutoff_steepness", "must not be negative"));
        }
        if !s.sharpness.is_finite() {
            return Err(invalid("sharpness", "must be finite"));
        }
        if o.steps == 0 {
            return Err(invalid("steps", "at least one optimization step is required"));
        }
        if !(o.learning_rate.is_finite() && o.learning_rate > 0.0) {
            return Err(invalid("learning_rate", "must be a positive number"));
        }
        if o.print_interval == 0 {
            return Err(invalid("print_interval", "must be at least 1"));
        }
        if !(o.weight_decay.is_finite() && o.weight_decay >= 0.0) {
            return Err(invalid("weight_decay", "must not be negative"));
        }
        Ok(())
    }
}
