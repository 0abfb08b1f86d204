// Pipeline error taxonomy
//
// Everything here is fatal to the current pipeline run: errors bubble up
// uncaught through the sequential pipeline, and retry policy (if any)
// belongs to the caller, never to the loop driver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or invalid configuration, detected before the pipeline starts.
    #[error("configuration error: {0}")]
    Config(String),

    /// The external model invocation failed (HTTP error, timeout, empty
    /// candidate list). The provider's own message surfaces unmodified.
    #[error("model invocation failed: {0}")]
    Invocation(#[from] anyhow::Error),

    /// The image analysis response could not be parsed into the product record.
    #[error("structured output did not parse: {0}")]
    StructuredOutput(#[from] serde_json::Error),

    /// The model violated a stage contract: the refine step produced neither
    /// a revised draft nor an exit call, or a critique came back empty.
    #[error("model violated the stage contract: {0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
