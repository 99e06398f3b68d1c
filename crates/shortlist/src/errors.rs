use thiserror::Error;

use crate::analysis::scoring::SchemaError;
use crate::llm_client::LlmError;

/// Error type for the fallible inner stages of the pipeline.
///
/// The public surface (`process_candidate` / `process_batch`) never returns
/// this: each stage's error is absorbed into an explicit fallback value at
/// the call site, so degradation is a visible branch rather than a hidden
/// catch-all.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("completion service error: {0}")]
    Llm(#[from] LlmError),

    #[error("response validation failed: {0}")]
    Schema(#[from] SchemaError),
}
