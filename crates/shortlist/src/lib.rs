//! Shortlist — a CV-to-job-description screening pipeline.
//!
//! Flow: document bytes → text extraction → LLM work-experience extraction →
//! experience-duration resolution → LLM fit scoring → batch ranking.
//!
//! The pipeline treats the completion service as an unreliable, best-effort
//! structured-data source: every degradation path terminates in a valid
//! [`ScoreResult`](analysis::scoring::ScoreResult), never an error, so a
//! single bad candidate cannot abort a batch. Fallback results carry
//! `degraded: true` so callers can tell a failed analysis apart from a
//! genuinely mediocre candidate.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod errors;
pub mod experience;
pub mod extract;
pub mod llm_client;
pub mod pipeline;

pub use analysis::scoring::{ApplicationStatus, ScoreResult};
pub use batch::{rank, BatchSummary, CandidateBatch};
pub use config::Config;
pub use experience::{ExperienceSummary, WorkExperienceRecord};
pub use extract::{Document, MediaType};
pub use llm_client::{CompletionClient, CompletionOptions};
pub use pipeline::{process_batch, process_candidate, JobPosting};
