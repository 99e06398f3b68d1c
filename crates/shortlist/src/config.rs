use anyhow::{Context, Result};

use crate::llm_client::CompletionOptions;

/// Pipeline configuration loaded from environment variables.
/// Model, temperature and token limit are configuration, not logic — the
/// three near-identical upstream variants collapse into these knobs.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Fixed delay between candidates in a batch, to stay under provider
    /// rate limits. Zero disables pacing.
    pub pacing_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            model: std::env::var("GROQ_MODEL").unwrap_or_else(|_| "llama3-8b-8192".to_string()),
            temperature: std::env::var("LLM_TEMPERATURE")
                .unwrap_or_else(|_| "0.2".to_string())
                .parse::<f32>()
                .context("LLM_TEMPERATURE must be a number")?,
            max_tokens: std::env::var("LLM_MAX_TOKENS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse::<u32>()
                .context("LLM_MAX_TOKENS must be an integer")?,
            pacing_ms: std::env::var("PACING_MS")
                .unwrap_or_else(|_| "0".to_string())
                .parse::<u64>()
                .context("PACING_MS must be an integer")?,
        })
    }

    /// Completion options for a single LLM call, derived from this config.
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            force_json: false,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
