use softalign::engine::config::DEFAULT_WEIGHT_DECAY;

/// Values used when neither a flag, a `--set` override nor the config file
/// provides one.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultsConfig {
    pub steps: usize,
    pub learning_rate: f64,
    pub print_interval: usize,
    pub weight_decay: f64,
    pub distance_cutoff: f64,
    pub cutoff_steepness: f64,
    pub sharpness: f64,
    pub sinkhorn_iterations: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            steps: 5000,
            learning_rate: 1e-3,
            print_interval: 100,
            weight_decay: DEFAULT_WEIGHT_DECAY,
            distance_cutoff: 7.0,
            cutoff_steepness: 2.0,
            sharpness: 20.0,
            sinkhorn_iterations: 10,
        }
    }
}
