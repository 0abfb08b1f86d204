// Critique step
//
// Evaluates the current draft against one rubric and writes either 1-2
// actionable suggestions or the completion sentinel into `criticism`.

use std::sync::Arc;

use super::prompts::Rubric;
use super::state::PipelineState;
use super::templates::resolve_template;
use crate::error::{PipelineError, Result};
use crate::providers::{LlmProvider, Message, ProviderRequest};

pub struct CritiqueStep {
    provider: Arc<dyn LlmProvider>,
    model: String,
    rubric: Rubric,
}

impl CritiqueStep {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>, rubric: Rubric) -> Self {
        Self {
            provider,
            model: model.into(),
            rubric,
        }
    }

    /// Reads: `current_product_description`. Writes: `criticism`.
    pub async fn run(&self, state: &mut PipelineState) -> Result<()> {
        let instruction = resolve_template(self.rubric.critique_template, state)?;
        let request =
            ProviderRequest::new(vec![Message::user(instruction)]).with_model(&self.model);

        let response = self.provider.send_message(&request).await?;
        let criticism = response.text().trim().to_string();

        if criticism.is_empty() {
            return Err(PipelineError::Protocol(format!(
                "{} critic returned neither feedback nor the completion phrase",
                self.rubric.name
            )));
        }

        tracing::debug!(rubric = self.rubric.name, "Critique: {}", criticism);
        state.set_criticism(criticism);
        Ok(())
    }
}
