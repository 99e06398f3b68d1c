//! Pipeline orchestration — the operations a presentation layer calls.
//!
//! Flow per candidate: extract text → LLM work-experience extraction →
//! duration resolution → LLM scoring → attach upload metadata.
//!
//! Candidates are processed strictly sequentially; progress reporting in
//! callers depends on that ordering. No error from a single candidate
//! escapes — each one terminates in a valid `ScoreResult`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::extraction::extract_work_experience;
use crate::analysis::scoring::{analyze, ScoreResult};
use crate::batch::{rank, CandidateBatch};
use crate::config::Config;
use crate::experience::total_experience;
use crate::extract::{extract_text, Document};
use crate::llm_client::CompletionClient;

/// A job opening to screen candidates against. The description and the
/// requirements block are concatenated before scoring, so both weigh into
/// the match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub description: String,
    pub requirements: String,
}

impl JobPosting {
    /// The text the scoring prompt sees for this job.
    pub fn matching_text(&self) -> String {
        format!("{}\n\nRequirements:\n{}", self.description, self.requirements)
    }
}

/// Processes one candidate document end to end. Always returns a
/// `ScoreResult`; extraction, resolution and scoring failures degrade
/// inside their stages.
pub async fn process_candidate(
    document: &Document,
    job: &JobPosting,
    client: &dyn CompletionClient,
    config: &Config,
) -> ScoreResult {
    info!(filename = %document.filename, job = %job.title, "processing candidate");

    let cv_text = extract_text(document);
    let record = extract_work_experience(&cv_text, client, config).await;
    let experience = total_experience(&record);
    let mut result = analyze(
        &cv_text,
        &job.matching_text(),
        &experience,
        client,
        config,
    )
    .await;

    result.filename = Some(document.filename.clone());
    result.total_experience = Some(experience.formatted.clone());
    result.experience_months = Some(experience.total_months);

    info!(
        filename = %document.filename,
        score = result.score,
        degraded = result.degraded,
        "candidate scored"
    );
    result
}

/// Processes a batch of documents sequentially and ranks the results.
/// N documents always yield N results. An optional fixed pacing delay
/// between candidates keeps the completion provider under its rate limits.
pub async fn process_batch(
    documents: &[Document],
    job: &JobPosting,
    client: &dyn CompletionClient,
    config: &Config,
) -> CandidateBatch {
    let mut results = Vec::with_capacity(documents.len());
    for (index, document) in documents.iter().enumerate() {
        if index > 0 && config.pacing_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.pacing_ms)).await;
        }
        results.push(process_candidate(document, job, client, config).await);
    }
    rank(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{CompletionOptions, LlmError};
    use async_trait::async_trait;

    const SCORE_RESPONSE: &str = r#"{
        "score": 7,
        "experience_relevance_score": 6,
        "skills_match_score": 8,
        "explanation": "Solid match.",
        "key_skills_matched": ["Rust"],
        "missing_skills": [],
        "experience_summary": "Four years of backend work."
    }"#;

    const EXPERIENCE_RESPONSE: &str = r#"{
        "work_experience": [
            {"position": "Engineer", "company": "Acme", "start_date": "2020-01", "end_date": "2024-01"}
        ]
    }"#;

    /// Answers the extraction prompt and the scoring prompt by inspecting
    /// the prompt text, like the live service would.
    struct RoutingClient;

    #[async_trait]
    impl CompletionClient for RoutingClient {
        async fn complete(
            &self,
            prompt: &str,
            _opts: &CompletionOptions,
        ) -> Result<String, LlmError> {
            if prompt.starts_with("Extract all work experience entries") {
                Ok(EXPERIENCE_RESPONSE.to_string())
            } else {
                Ok(SCORE_RESPONSE.to_string())
            }
        }
    }

    fn config() -> Config {
        Config {
            groq_api_key: "test-key".to_string(),
            model: "llama3-8b-8192".to_string(),
            temperature: 0.2,
            max_tokens: 1000,
            pacing_ms: 0,
        }
    }

    fn job() -> JobPosting {
        JobPosting {
            title: "Senior Rust Engineer".to_string(),
            description: "Build the matching pipeline.".to_string(),
            requirements: "5+ years Rust.".to_string(),
        }
    }

    #[test]
    fn test_matching_text_concatenates_description_and_requirements() {
        assert_eq!(
            job().matching_text(),
            "Build the matching pipeline.\n\nRequirements:\n5+ years Rust."
        );
    }

    #[tokio::test]
    async fn test_process_candidate_attaches_upload_metadata() {
        let doc = Document::text("jane.txt", b"Jane Doe, Rust Engineer".to_vec());
        let result = process_candidate(&doc, &job(), &RoutingClient, &config()).await;

        assert_eq!(result.score, 7);
        assert_eq!(result.filename.as_deref(), Some("jane.txt"));
        assert_eq!(result.experience_months, Some(48));
        assert_eq!(result.total_experience.as_deref(), Some("4 years, 0 months"));
        assert!(!result.degraded);
    }

    #[tokio::test]
    async fn test_batch_keeps_failed_extractions() {
        // One readable CV and one corrupt PDF: the batch must still produce
        // two results, with the corrupt document scored on its error marker.
        let docs = vec![
            Document::text("good.txt", b"Jane Doe, Rust Engineer".to_vec()),
            Document::pdf("broken.pdf", b"not a pdf".to_vec()),
        ];
        let batch = process_batch(&docs, &job(), &RoutingClient, &config()).await;

        assert_eq!(batch.len(), 2);
        let names: Vec<_> = batch
            .results()
            .iter()
            .filter_map(|r| r.filename.as_deref())
            .collect();
        assert!(names.contains(&"good.txt"));
        assert!(names.contains(&"broken.pdf"));
    }

    #[tokio::test]
    async fn test_batch_is_ranked() {
        struct DecreasingClient(std::sync::Mutex<u8>);

        #[async_trait]
        impl CompletionClient for DecreasingClient {
            async fn complete(
                &self,
                prompt: &str,
                _opts: &CompletionOptions,
            ) -> Result<String, LlmError> {
                if prompt.starts_with("Extract all work experience entries") {
                    return Ok(r#"{"work_experience": []}"#.to_string());
                }
                let mut next = self.0.lock().unwrap();
                let score = *next;
                *next += 3;
                Ok(format!(
                    r#"{{"score": {score}, "experience_relevance_score": 5, "skills_match_score": 5,
                        "explanation": "x", "key_skills_matched": [], "missing_skills": [],
                        "experience_summary": "x"}}"#
                ))
            }
        }

        // Scores arrive 3, 6, 9 in upload order; the batch is returned 9, 6, 3.
        let docs = vec![
            Document::text("low.txt", b"a".to_vec()),
            Document::text("mid.txt", b"b".to_vec()),
            Document::text("high.txt", b"c".to_vec()),
        ];
        let client = DecreasingClient(std::sync::Mutex::new(3));
        let batch = process_batch(&docs, &job(), &client, &config()).await;

        let scores: Vec<_> = batch.results().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![9, 6, 3]);
        assert_eq!(batch.results()[0].filename.as_deref(), Some("high.txt"));
    }
}
