// Model provider abstraction
//
// The pipeline treats the hosted model as an external collaborator behind
// this trait: resolve an instruction template, send one request, inspect the
// response. Timeouts and retries live here, not in the loop driver.

use anyhow::Result;
use async_trait::async_trait;

pub mod factory;
pub mod gemini;
pub mod retry;
pub mod types;

pub use factory::create_provider;
pub use types::{ContentBlock, Message, ProviderRequest, ProviderResponse, ToolDefinition, ToolUse};

/// Trait for model providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a request and wait for the complete response.
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Provider name (e.g. "gemini")
    fn name(&self) -> &str;

    /// Default model used when the request leaves the model field empty.
    fn default_model(&self) -> &str;

    /// Whether the provider supports tool/function calling.
    fn supports_tools(&self) -> bool {
        true
    }
}
