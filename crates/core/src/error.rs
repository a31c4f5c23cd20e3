//! Error types for the GitTeach domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant. The pipeline's tolerance
//! policy is decided per call site (fail closed at routing, fail fast at
//! construction, degrade at responding), so the kinds are kept distinct
//! rather than collapsed into one catch-all.

use thiserror::Error;

/// The top-level error type for all GitTeach operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Completion backend errors ---
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    // --- Model output parsing errors ---
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    // --- Parameter construction errors ---
    #[error("Parameter error: {0}")]
    Parameters(#[from] ParameterError),

    // --- Tool execution errors ---
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    // --- Responder errors ---
    #[error("Responder error: {0}")]
    Respond(#[from] RespondError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Transport-level failures from the completion backend.
///
/// The backend never retries internally; retry policy, if any, belongs to
/// the caller.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("backend timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("backend returned status {status_code}: {message}")]
    Backend { status_code: u16, message: String },
}

/// A model reply that is not recoverable JSON.
///
/// Carries the raw text verbatim so the caller can log or surface it;
/// nothing downstream ever silently defaults over it.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("model output is not a JSON object: {raw}")]
    Malformed { raw: String },
}

/// Schema violations during parameter construction.
///
/// Distinct from [`ParseError`]: the reply parsed as JSON but did not
/// satisfy the tool's schema.
#[derive(Debug, Clone, Error)]
pub enum ParameterError {
    #[error("missing required parameters: {}", .missing.join(", "))]
    Incomplete { missing: Vec<String> },

    #[error("tool not in catalog: {0}")]
    UnknownTool(String),
}

/// Failures from the external tool executor collaborator.
#[derive(Debug, Clone, Error)]
pub enum ExecutionError {
    #[error("tool execution failed: {tool_id}: {reason}")]
    Failed { tool_id: String, reason: String },
}

/// A responder reply that fails the length/sanity check.
///
/// Non-fatal by policy: the orchestrator degrades to a templated
/// confirmation, since the side effect has already happened.
#[derive(Debug, Clone, Error)]
pub enum RespondError {
    #[error("responder returned an empty reply")]
    Empty,

    #[error("responder reply is {len} chars, over the {max_chars} budget")]
    TooLong { len: usize, max_chars: usize },
}
