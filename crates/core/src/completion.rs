//! CompletionClient trait — the abstraction over the completion backend.
//!
//! A client knows how to send one (system prompt, user message, temperature)
//! triple to a chat-completions endpoint and return the raw response text.
//! It is deliberately narrow: no conversation state, no streaming, no
//! retries. The backend is an unreliable, latency-bearing external service,
//! and every call site in the pipeline declares its own tolerance policy.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CompletionError;

/// A single completion request.
///
/// `temperature` is passed through unmodified; `0.0` is a request for
/// maximal determinism and the client must not interpret or clamp it.
/// `timeout` bounds this call only, not the whole turn.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The system prompt for this stage.
    pub system_prompt: String,

    /// The user's utterance, forwarded verbatim.
    pub user_input: String,

    /// Sampling temperature (0.0 = deterministic).
    pub temperature: f32,

    /// Per-call timeout.
    pub timeout: Duration,
}

impl CompletionRequest {
    /// Build a request with the given temperature and timeout.
    pub fn new(
        system_prompt: impl Into<String>,
        user_input: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_input: user_input.into(),
            temperature,
            timeout,
        }
    }
}

/// The completion backend trait.
///
/// Implementations make exactly one outbound call per `complete` invocation
/// and map transport failures onto [`CompletionError`]. Retrying is the
/// caller's decision, never the client's.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// A human-readable name for this backend (e.g., "openai_compat").
    fn name(&self) -> &str;

    /// Send one request and return the raw response text.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<String, CompletionError>;
}
