// Bounded refinement loop
//
// Couples one critique step and one refine-or-exit step and alternates them
// until the refiner signals exit or the iteration cap is reached. Critique
// always strictly precedes its paired refinement; iterations never overlap.

use std::sync::Arc;

use super::critique::CritiqueStep;
use super::prompts::Rubric;
use super::refine::RefineStep;
use super::state::PipelineState;
use crate::error::Result;
use crate::providers::LlmProvider;

/// Loop bounds. The cap is a cost/latency bound, not a correctness gate.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub max_iterations: usize,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self { max_iterations: 3 }
    }
}

/// Terminal state of a refinement loop. Both leave the draft at whatever
/// value was last written; nothing is rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    /// The refiner signaled exit; `iterations` completed.
    Exited { iterations: usize },
    /// The cap was reached without an exit signal.
    MaxIterationsReached { iterations: usize },
}

impl LoopOutcome {
    pub fn iterations(&self) -> usize {
        match self {
            LoopOutcome::Exited { iterations }
            | LoopOutcome::MaxIterationsReached { iterations } => *iterations,
        }
    }
}

pub struct RefinementLoop {
    critique: CritiqueStep,
    refine: RefineStep,
    rubric_name: &'static str,
    config: LoopConfig,
}

impl RefinementLoop {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        rubric: Rubric,
        config: LoopConfig,
    ) -> Self {
        let model = model.into();
        Self {
            critique: CritiqueStep::new(provider.clone(), model.clone(), rubric),
            refine: RefineStep::new(provider, model, rubric),
            rubric_name: rubric.name,
            config,
        }
    }

    /// Drive critique/refine iterations to a terminal state.
    pub async fn run(&self, state: &mut PipelineState) -> Result<LoopOutcome> {
        // Fresh loop invocation: the exit flag may be a leftover from a
        // previous loop over the same state.
        state.clear_exit();

        for iteration in 1..=self.config.max_iterations {
            tracing::info!(
                rubric = self.rubric_name,
                "Iteration {}/{}",
                iteration,
                self.config.max_iterations
            );

            self.critique.run(state).await?;
            self.refine.run(state).await?;

            if state.exit_requested() {
                tracing::info!(rubric = self.rubric_name, iteration, "Loop exited early");
                return Ok(LoopOutcome::Exited {
                    iterations: iteration,
                });
            }
        }

        tracing::info!(
            rubric = self.rubric_name,
            "Iteration cap reached; keeping the last draft"
        );
        Ok(LoopOutcome::MaxIterationsReached {
            iterations: self.config.max_iterations,
        })
    }
}
