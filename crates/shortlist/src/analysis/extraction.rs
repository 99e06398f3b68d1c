//! LLM-driven work-experience extraction.
//!
//! The completion service is treated as an unreliable structured-data
//! source: a failed call or malformed response degrades to an empty record
//! ("no experience detected") and the candidate's analysis continues.

use tracing::warn;

use crate::analysis::prompts::work_experience_prompt;
use crate::analysis::scoring::SchemaError;
use crate::config::Config;
use crate::errors::PipelineError;
use crate::experience::WorkExperienceRecord;
use crate::llm_client::{strip_json_fences, CompletionClient};

/// Extracts work-experience entries from CV text. Never fails: any service
/// or parse error yields an empty record.
pub async fn extract_work_experience(
    cv_text: &str,
    client: &dyn CompletionClient,
    config: &Config,
) -> WorkExperienceRecord {
    match request_work_experience(cv_text, client, config).await {
        Ok(record) => record,
        Err(e) => {
            warn!(error = %e, "work-experience extraction degraded to empty record");
            WorkExperienceRecord::default()
        }
    }
}

/// The fallible inner call: one completion request, fence-strip, strict
/// parse. Kept separate so the degrade-to-empty policy above is an explicit
/// branch, not a catch-all.
async fn request_work_experience(
    cv_text: &str,
    client: &dyn CompletionClient,
    config: &Config,
) -> Result<WorkExperienceRecord, PipelineError> {
    let prompt = work_experience_prompt(cv_text);
    let response = client.complete(&prompt, &config.completion_options()).await?;
    let record = serde_json::from_str(strip_json_fences(&response)).map_err(SchemaError::Json)?;
    Ok(record)
}
