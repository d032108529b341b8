use super::config::OptimizationConfig;
use crate::core::transform::TransformParams;

/// AdamW with decoupled weight decay and bias-corrected moments.
///
/// Owns the moment estimates for a single parameter vector; one instance per
/// optimization run.
#[derive(Debug, Clone)]
pub struct AdamW {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    weight_decay: f64,
    first_moment: TransformParams,
    second_moment: TransformParams,
    steps_taken: i32,
}

impl AdamW {
    pub fn new(config: &OptimizationConfig) -> Self {
        Self {
            learning_rate: config.learning_rate,
            beta1: config.beta1,
            beta2: config.beta2,
            epsilon: config.epsilon,
            weight_decay: config.weight_decay,
            first_moment: TransformParams::zeros(),
            second_moment: TransformParams::zeros(),
            steps_taken: 0,
        }
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken as usize
    }

    /// Descends `params` along `gradient` by one step.
    pub fn step(&mut self, params: &mut TransformParams, gradient: &TransformParams) {
        self.steps_taken = self.steps_taken.saturating_add(1);
        let t = self.steps_taken;

        *params *= 1.0 - self.learning_rate * self.weight_decay;

        self.first_moment = self.first_moment * self.beta1 + gradient * (1.0 - self.beta1);
        self.second_moment =
            self.second_moment * self.beta2 + gradient.component_mul(gradient) * (1.0 - self.beta2);

        let first_correction = 1.0 - self.beta1.powi(t);
        let second_correction = 1.0 - self.beta2.powi(t);
        for k in 0..params.len() {
            let m_hat = self.first_moment[k] / first_correction;
            let v_hat = self.second_moment[k] / second_correction;
            params[k] -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
        }
    }
}
