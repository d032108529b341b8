use crate::core::transform::{RigidTransform, TransformParams};
use crate::engine::config::OptimizationConfig;
use crate::engine::error::EngineError;
use crate::engine::objective::DifferentiableObjective;
use crate::engine::optimizer::AdamW;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::OptimizationOutcome;
use tracing::{debug, info, instrument, trace};

/// Gradient ascent on `objective` from the identity transform for exactly
/// `config.steps` AdamW updates. There is no convergence test.
#[instrument(skip_all, name = "transform_search_task", fields(steps = config.steps))]
pub fn run<O>(
    objective: &O,
    config: &OptimizationConfig,
    reporter: &ProgressReporter,
) -> Result<OptimizationOutcome, EngineError>
where
    O: DifferentiableObjective + ?Sized,
{
    let mut params = TransformParams::zeros();
    let mut optimizer = AdamW::new(config);
    let mut last = None;

    reporter.report(Progress::TaskStart {
        total_steps: config.steps as u64,
    });

    for step in 0..config.steps {
        let evaluation = objective.evaluate(&params);
        trace!(step, score = evaluation.score, "Evaluated objective.");

        if step % config.print_interval == 0 || step + 1 == config.steps {
            debug!("Step {:05}: score = {:.4}", step, evaluation.score);
            reporter.report(Progress::Score {
                step,
                score: evaluation.score,
            });
        }

        optimizer.step(&mut params, &evaluation.loss_gradient);
        last = Some(evaluation);
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);

    let last = last.ok_or_else(|| {
        EngineError::Internal("Transform search finished without evaluating a step.".to_string())
    })?;
    info!(
        "Transform search finished after {} steps with score {:.4}.",
        optimizer.steps_taken(),
        last.score
    );

    Ok(OptimizationOutcome {
        params,
        transform: RigidTransform::from_params(&params),
        score: last.score,
        assignment: last.assignment,
        steps: optimizer.steps_taken(),
    })
}
