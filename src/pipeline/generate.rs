// Generation step
//
// Runs once at the start of a pipeline: analyzes the product image into a
// structured record, then writes the first prose draft from it. Both
// invocations overwrite `current_product_description`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::prompts::{IMAGE_ANALYSIS_INSTRUCTION, INITIAL_DRAFT_TEMPLATE};
use super::state::PipelineState;
use super::templates::resolve_template;
use crate::error::Result;
use crate::image::ImagePayload;
use crate::providers::{ContentBlock, LlmProvider, Message, ProviderRequest};

/// Structured record produced by the image-analysis invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub name: String,
    pub weight: String,
    pub attributes: Vec<String>,
    pub manufacturer: String,
    pub description: String,
}

pub struct GenerationStep {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl GenerationStep {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Analyze the image and write the initial draft.
    ///
    /// Reads: the image, `product_given` (optional seed).
    /// Writes: `current_product_description` (twice; last write wins).
    pub async fn run(&self, image: &ImagePayload, state: &mut PipelineState) -> Result<()> {
        let record = self.analyze_image(image, state.product_given()).await?;
        tracing::info!(product = %record.name, "Image analysis complete");

        // The record seeds the draft key; the writer invocation below reads
        // it back through its instruction template and overwrites it.
        state.set_draft(serde_json::to_string_pretty(&record)?);

        let instruction = resolve_template(INITIAL_DRAFT_TEMPLATE, state)?;
        let request =
            ProviderRequest::new(vec![Message::user(instruction)]).with_model(&self.model);
        let response = self.provider.send_message(&request).await?;

        let draft = response.text().trim().to_string();
        tracing::debug!(chars = draft.len(), "Initial draft written");
        state.set_draft(draft);
        Ok(())
    }

    async fn analyze_image(
        &self,
        image: &ImagePayload,
        seed: Option<&str>,
    ) -> Result<ProductRecord> {
        let mut instruction = IMAGE_ANALYSIS_INSTRUCTION.to_string();
        if let Some(seed) = seed {
            instruction.push_str(&format!("\n\nProduct given: {seed}"));
        }

        let message = Message::with_content(
            "user",
            vec![
                ContentBlock::Text { text: instruction },
                ContentBlock::Image {
                    media_type: image.media_type.clone(),
                    data: image.to_base64(),
                },
            ],
        );

        let request = ProviderRequest::new(vec![message])
            .with_model(&self.model)
            .with_json_output(true);
        let response = self.provider.send_message(&request).await?;

        parse_product_record(&response.text())
    }
}

/// Parse the analysis response into a ProductRecord.
///
/// The model is asked for bare JSON but may wrap it in markdown code fences;
/// strip them before parsing. Unparseable output is fatal to the run.
pub fn parse_product_record(text: &str) -> Result<ProductRecord> {
    let stripped = strip_markdown_fences(text.trim());
    Ok(serde_json::from_str(stripped)?)
}

/// Strip leading/trailing markdown code fences (```json ... ``` or ``` ... ```)
fn strip_markdown_fences(s: &str) -> &str {
    let s = s.trim();
    let s = if let Some(rest) = s.strip_prefix("```json") {
        rest
    } else if let Some(rest) = s.strip_prefix("```") {
        rest
    } else {
        s
    };
    if let Some(rest) = s.strip_suffix("```") {
        rest.trim()
    } else {
        s.trim()
    }
}
