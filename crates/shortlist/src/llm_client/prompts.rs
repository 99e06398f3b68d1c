// Cross-cutting prompt fragments. Each service that calls the LLM defines
// its own prompts.rs alongside it; only shared pieces live here.

/// Closing instruction appended to every prompt that expects a JSON reply.
/// The model is not contractually bound by it — callers still validate.
pub const JSON_ONLY_FOOTER: &str = "Return only the JSON with no additional text.";
