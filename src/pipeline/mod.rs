// Product description pipeline
//
// Fixed, non-reorderable sequence: generation step, then an
// engagement-rubric refinement loop, then an SEO-rubric refinement loop.
// Every stage reads and writes one shared PipelineState; a failure in any
// stage aborts the whole run.

use std::sync::Arc;

pub mod critique;
pub mod generate;
pub mod loop_runner;
pub mod prompts;
pub mod refine;
pub mod state;
pub mod templates;

pub use generate::{GenerationStep, ProductRecord};
pub use loop_runner::{LoopConfig, LoopOutcome, RefinementLoop};
pub use prompts::{Rubric, COMPLETION_PHRASE, ENGAGEMENT_RUBRIC, SEO_RUBRIC};
pub use state::PipelineState;

use crate::error::{PipelineError, Result};
use crate::image::ImagePayload;
use crate::providers::LlmProvider;

/// Result of a full pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    /// The final product description.
    pub description: String,
    pub engagement: LoopOutcome,
    pub seo: LoopOutcome,
}

pub struct ProductPipeline {
    generation: GenerationStep,
    engagement: RefinementLoop,
    seo: RefinementLoop,
}

impl ProductPipeline {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            generation: GenerationStep::new(provider.clone(), model.clone()),
            engagement: RefinementLoop::new(
                provider.clone(),
                model.clone(),
                ENGAGEMENT_RUBRIC,
                LoopConfig::default(),
            ),
            seo: RefinementLoop::new(provider, model, SEO_RUBRIC, LoopConfig::default()),
        }
    }

    /// Run the full pipeline against a product image.
    pub async fn run(
        &self,
        image: &ImagePayload,
        seed: Option<&str>,
    ) -> Result<PipelineReport> {
        let mut state = PipelineState::new();
        if let Some(seed) = seed {
            state.set_product_given(seed);
        }

        self.generation.run(image, &mut state).await?;
        let engagement = self.engagement.run(&mut state).await?;
        let seo = self.seo.run(&mut state).await?;

        let description = state
            .draft()
            .ok_or_else(|| {
                PipelineError::Protocol("pipeline finished without a draft in state".to_string())
            })?
            .to_string();

        Ok(PipelineReport {
            description,
            engagement,
            seo,
        })
    }
}
