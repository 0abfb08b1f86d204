// Refine-or-exit step
//
// The model is instructed to either rewrite the draft or call the exit_loop
// tool, but the branch is enforced here, in host code: the response content
// is inspected and exactly one of {exit flag, revised draft} is produced.
// A response with both prefers the tool outcome; a response with neither is
// a protocol error.

use std::sync::Arc;

use super::prompts::{Rubric, COMPLETION_PHRASE, EXIT_LOOP_DESCRIPTION, EXIT_LOOP_TOOL};
use super::state::PipelineState;
use super::templates::resolve_template;
use crate::error::{PipelineError, Result};
use crate::providers::{LlmProvider, Message, ProviderRequest, ToolDefinition};

pub fn exit_loop_tool() -> ToolDefinition {
    ToolDefinition::no_args(EXIT_LOOP_TOOL, EXIT_LOOP_DESCRIPTION)
}

pub struct RefineStep {
    provider: Arc<dyn LlmProvider>,
    model: String,
    rubric: Rubric,
}

impl RefineStep {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>, rubric: Rubric) -> Self {
        Self {
            provider,
            model: model.into(),
            rubric,
        }
    }

    /// Reads: `current_product_description`, `criticism`.
    /// Writes: either `current_product_description` or the exit flag, never both.
    pub async fn run(&self, state: &mut PipelineState) -> Result<()> {
        let instruction = resolve_template(self.rubric.refine_template, state)?;
        let request = ProviderRequest::new(vec![Message::user(instruction)])
            .with_model(&self.model)
            .with_tools(vec![exit_loop_tool()]);

        let response = self.provider.send_message(&request).await?;

        let exit_called = response
            .tool_uses()
            .iter()
            .any(|tool| tool.name == EXIT_LOOP_TOOL);
        let text = response.text().trim().to_string();

        if exit_called {
            if !text.is_empty() {
                tracing::warn!(
                    rubric = self.rubric.name,
                    "Refiner emitted text alongside exit_loop; keeping the exit and \
                     discarding the text"
                );
            }
            tracing::info!(rubric = self.rubric.name, "exit_loop called");
            state.request_exit();
            return Ok(());
        }

        if text.is_empty() {
            return Err(PipelineError::Protocol(format!(
                "{} refiner produced neither a revised draft nor an exit_loop call",
                self.rubric.name
            )));
        }

        // A sentinel critique must never result in a rewritten draft.
        if state.criticism() == Some(COMPLETION_PHRASE) {
            return Err(PipelineError::Protocol(format!(
                "{} refiner rewrote the draft although the critique was the completion phrase",
                self.rubric.name
            )));
        }

        tracing::debug!(
            rubric = self.rubric.name,
            chars = text.len(),
            "Draft refined"
        );
        state.set_draft(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::prompts::{COMPLETION_PHRASE, SEO_RUBRIC};
    use crate::pipeline::test_support::ScriptedProvider;

    fn seeded_state() -> PipelineState {
        let mut state = PipelineState::new();
        state.set_draft("Draft zero.");
        state.set_criticism("- Mention the material");
        state
    }

    #[tokio::test]
    async fn test_feedback_rewrites_draft_without_exit() {
        let provider = Arc::new(ScriptedProvider::with_texts(vec!["Draft one, improved."]));
        let step = RefineStep::new(provider, "test-model", SEO_RUBRIC);

        let mut state = seeded_state();
        step.run(&mut state).await.unwrap();

        assert_eq!(state.draft(), Some("Draft one, improved."));
        assert!(!state.exit_requested());
    }

    #[tokio::test]
    async fn test_exit_call_sets_flag_and_preserves_draft() {
        let provider = Arc::new(ScriptedProvider::with_exit_call());
        let step = RefineStep::new(provider, "test-model", SEO_RUBRIC);

        let mut state = seeded_state();
        state.set_criticism(COMPLETION_PHRASE);
        step.run(&mut state).await.unwrap();

        assert_eq!(state.draft(), Some("Draft zero."));
        assert!(state.exit_requested());
    }

    #[tokio::test]
    async fn test_text_plus_exit_prefers_the_exit() {
        let provider = Arc::new(ScriptedProvider::with_text_and_exit_call(
            "spurious revision",
        ));
        let step = RefineStep::new(provider, "test-model", SEO_RUBRIC);

        let mut state = seeded_state();
        step.run(&mut state).await.unwrap();

        // Tool outcome wins; the draft is untouched
        assert_eq!(state.draft(), Some("Draft zero."));
        assert!(state.exit_requested());
    }

    #[tokio::test]
    async fn test_rewrite_on_sentinel_critique_is_protocol_error() {
        let provider = Arc::new(ScriptedProvider::with_texts(vec!["spurious revision"]));
        let step = RefineStep::new(provider, "test-model", SEO_RUBRIC);

        let mut state = seeded_state();
        state.set_criticism(COMPLETION_PHRASE);
        let err = step.run(&mut state).await.unwrap_err();

        assert!(matches!(err, PipelineError::Protocol(_)));
        // The draft must never be altered on a sentinel critique
        assert_eq!(state.draft(), Some("Draft zero."));
        assert!(!state.exit_requested());
    }

    #[tokio::test]
    async fn test_neither_text_nor_exit_is_protocol_error() {
        let provider = Arc::new(ScriptedProvider::with_texts(vec![""]));
        let step = RefineStep::new(provider, "test-model", SEO_RUBRIC);

        let mut state = seeded_state();
        let err = step.run(&mut state).await.unwrap_err();
        assert!(matches!(err, PipelineError::Protocol(_)));
        assert!(!state.exit_requested());
    }

    #[tokio::test]
    async fn test_refiner_request_offers_the_exit_tool() {
        let provider = Arc::new(ScriptedProvider::with_texts(vec!["Draft one."]));
        let step = RefineStep::new(provider.clone(), "test-model", SEO_RUBRIC);

        let mut state = seeded_state();
        step.run(&mut state).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let tools = requests[0].tools.as_ref().unwrap();
        assert_eq!(tools[0].name, EXIT_LOOP_TOOL);
    }
}
