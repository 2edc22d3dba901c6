//! Model invocation boundary.
//!
//! Both backends satisfy the same contract: system instruction + user message
//! in, text out, with an optional request for strictly-structured JSON output.
//! The backend is chosen from the configured model name: `gemini*` goes to the
//! Gemini API, everything else to the OpenAI chat completions API.

mod gemini;
mod openai;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

use async_trait::async_trait;

use crate::Result;

/// One model call: a fixed system instruction plus the composed user message.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system: String,
    pub user: String,
    /// Ask the backend for strictly-structured JSON output.
    pub json_output: bool,
}

/// Generative model client.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: LlmRequest) -> Result<String>;
}

/// Build the client for a model name.
///
/// # Errors
///
/// Returns [`crate::Error::MissingApiKey`] before any network call when the
/// backend's API key environment variable is not set.
pub fn client_for_model(model: &str) -> Result<Box<dyn LlmClient>> {
    if model.starts_with("gemini") {
        Ok(Box::new(GeminiClient::from_env(model.to_string())?))
    } else {
        Ok(Box::new(OpenAiClient::from_env(model.to_string())?))
    }
}
