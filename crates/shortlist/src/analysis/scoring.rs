//! CV scoring — matches one CV against one job description via the
//! completion service and validates the structured verdict.
//!
//! `analyze` never returns an error. The two failure classes substitute
//! distinct canonical fallbacks (all scores 5, `degraded: true`) so batch
//! processing always receives one [`ScoreResult`] per candidate.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::analysis::prompts::analysis_prompt;
use crate::config::Config;
use crate::errors::PipelineError;
use crate::experience::ExperienceSummary;
use crate::llm_client::{strip_json_fences, CompletionClient};

/// Validation failure for a scoring response. Produced before any fallback
/// substitution so the degrade path is a tagged, testable branch.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),
}

/// Structured outcome of matching one CV against one job description.
///
/// `filename`, `total_experience` and `experience_months` are attached by
/// the pipeline after scoring; `degraded` marks fallback results so callers
/// can tell a failed analysis apart from a genuinely mediocre candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub skills_match_score: u8,
    pub experience_relevance_score: u8,
    pub explanation: String,
    pub key_skills_matched: Vec<String>,
    pub missing_skills: Vec<String>,
    pub experience_summary: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub total_experience: Option<String>,
    #[serde(default)]
    pub experience_months: Option<u32>,
    #[serde(default)]
    pub degraded: bool,
}

impl ScoreResult {
    pub fn status(&self) -> ApplicationStatus {
        ApplicationStatus::from_score(self.score)
    }
}

/// Screening status derived from the overall score: 6 and above goes to
/// review, everything below is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Reviewed,
    Rejected,
}

impl ApplicationStatus {
    pub fn from_score(score: u8) -> Self {
        if score >= 6 {
            ApplicationStatus::Reviewed
        } else {
            ApplicationStatus::Rejected
        }
    }
}

/// Scores a CV against a job description. One completion request, then an
/// explicit validate-or-fallback branch; this function never fails.
pub async fn analyze(
    cv_text: &str,
    job_description: &str,
    experience: &ExperienceSummary,
    client: &dyn CompletionClient,
    config: &Config,
) -> ScoreResult {
    match request_analysis(cv_text, job_description, experience, client, config).await {
        Ok(result) => result,
        Err(PipelineError::Schema(e)) => {
            warn!(error = %e, "scoring response failed validation, substituting fallback");
            fallback_for_invalid_response()
        }
        Err(PipelineError::Llm(e)) => {
            warn!(error = %e, "scoring call failed, substituting fallback");
            fallback_for_service_error(&e.to_string())
        }
    }
}

async fn request_analysis(
    cv_text: &str,
    job_description: &str,
    experience: &ExperienceSummary,
    client: &dyn CompletionClient,
    config: &Config,
) -> Result<ScoreResult, PipelineError> {
    let prompt = analysis_prompt(job_description, cv_text, experience);
    let response = client.complete(&prompt, &config.completion_options()).await?;
    Ok(validate_score_response(&response)?)
}

/// Validates a raw scoring response: fence-strip, strict JSON parse,
/// required-key and type checks. Scores are clamped to 1..=10 — the model
/// is not contractually bound to the range the prompt requests.
pub fn validate_score_response(raw: &str) -> Result<ScoreResult, SchemaError> {
    let value: Value = serde_json::from_str(strip_json_fences(raw))?;

    Ok(ScoreResult {
        score: require_score(&value, "score")?,
        skills_match_score: require_score(&value, "skills_match_score")?,
        experience_relevance_score: require_score(&value, "experience_relevance_score")?,
        explanation: require_str(&value, "explanation")?,
        key_skills_matched: require_str_list(&value, "key_skills_matched")?,
        missing_skills: require_str_list(&value, "missing_skills")?,
        experience_summary: require_str(&value, "experience_summary")?,
        filename: None,
        total_experience: None,
        experience_months: None,
        degraded: false,
    })
}

fn require_field<'a>(value: &'a Value, key: &'static str) -> Result<&'a Value, SchemaError> {
    value.get(key).ok_or(SchemaError::MissingField(key))
}

fn require_score(value: &Value, key: &'static str) -> Result<u8, SchemaError> {
    let n = require_field(value, key)?
        .as_i64()
        .ok_or(SchemaError::WrongType(key))?;
    Ok(n.clamp(1, 10) as u8)
}

fn require_str(value: &Value, key: &'static str) -> Result<String, SchemaError> {
    Ok(require_field(value, key)?
        .as_str()
        .ok_or(SchemaError::WrongType(key))?
        .to_string())
}

fn require_str_list(value: &Value, key: &'static str) -> Result<Vec<String>, SchemaError> {
    let items = require_field(value, key)?
        .as_array()
        .ok_or(SchemaError::WrongType(key))?;
    Ok(items
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect())
}

fn fallback_for_invalid_response() -> ScoreResult {
    canonical_fallback(
        "Unable to properly analyze this CV due to formatting issues.".to_string(),
        "Experience details could not be extracted accurately.".to_string(),
    )
}

fn fallback_for_service_error(cause: &str) -> ScoreResult {
    canonical_fallback(
        format!("Error analyzing CV: {cause}"),
        "Analysis failed due to technical issues.".to_string(),
    )
}

fn canonical_fallback(explanation: String, experience_summary: String) -> ScoreResult {
    ScoreResult {
        score: 5,
        skills_match_score: 5,
        experience_relevance_score: 5,
        explanation,
        key_skills_matched: vec![],
        missing_skills: vec![],
        experience_summary,
        filename: None,
        total_experience: None,
        experience_months: None,
        degraded: true,
    }
}
