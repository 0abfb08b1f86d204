// Provider factory
//
// Builds the concrete model provider from resolved settings.

use anyhow::{bail, Result};
use std::sync::Arc;

use super::gemini::GeminiProvider;
use super::LlmProvider;
use crate::config::Settings;

/// Create the model provider configured in `settings`.
pub fn create_provider(settings: &Settings) -> Result<Arc<dyn LlmProvider>> {
    let Some(api_key) = settings.api_key.clone() else {
        bail!(
            "No API key configured. Set GEMINI_API_KEY or add `api_key` to \
             ~/.prodscribe/config.toml"
        );
    };

    let provider = GeminiProvider::new(api_key)?.with_model(settings.model.clone());
    Ok(Arc::new(provider))
}
