//! Turn domain types — the value objects that flow through one request.
//!
//! A turn is one complete request/response cycle: user utterance in, final
//! message out. Everything here is ephemeral; an [`AgentTurn`] is created at
//! request entry, filled stage by stage, and discarded once the final
//! message is produced. No turn outlives a request and no mutable state is
//! shared between turns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::error::{Error, ExecutionError};

/// The router's verdict for one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
    /// No tool matched; the turn ends with a conversational reply.
    Chat,
    /// A catalog tool matched.
    Tool { tool_id: String },
}

impl RouteDecision {
    /// The routed tool id, if any.
    pub fn tool_id(&self) -> Option<&str> {
        match self {
            RouteDecision::Chat => None,
            RouteDecision::Tool { tool_id } => Some(tool_id),
        }
    }
}

/// A validated parameter object for one tool invocation.
///
/// Produced by the constructor and consumed exactly once by the executor.
/// The `tool_id` always equals the routed tool id it was derived from; the
/// constructor writes it from the route, never from model output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSet {
    /// The tool this parameter set belongs to.
    pub tool_id: String,

    /// The action verb (e.g., "read_repo", "insert_banner").
    pub action: String,

    /// Extracted parameters. Values are JSON primitives only.
    pub params: BTreeMap<String, serde_json::Value>,
}

impl ParameterSet {
    /// Fetch a parameter as a string, if present and a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(|v| v.as_str())
    }
}

/// The result of one tool execution, passed by value into the responder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// The tool that ran.
    pub tool_id: String,

    /// Whether the side effect succeeded.
    pub success: bool,

    /// Human-readable summary of what happened.
    pub summary: String,
}

/// The external executor collaborator.
///
/// Performs the actual side effect for a parameter set and reports back a
/// result summary. The pipeline defines only this contract; what the
/// executor does with it is outside the core.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(
        &self,
        params: &ParameterSet,
    ) -> std::result::Result<ExecutionResult, ExecutionError>;
}

/// Pipeline stages, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Routing,
    Constructing,
    Executing,
    Responding,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Routing => write!(f, "routing"),
            Stage::Constructing => write!(f, "constructing"),
            Stage::Executing => write!(f, "executing"),
            Stage::Responding => write!(f, "responding"),
        }
    }
}

/// The single structured failure value a fatal turn yields.
///
/// Carries the stage that failed and the underlying reason; no partial or
/// ambiguous state is exposed alongside it.
#[derive(Debug, Error)]
#[error("turn failed during {stage}: {source}")]
pub struct TurnFailure {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

impl TurnFailure {
    pub fn new(stage: Stage, source: impl Into<Error>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

/// One request's lifecycle, filled in stage by stage.
///
/// `parameters` and `execution` stay `None` for chat turns; `final_message`
/// is set exactly once when the turn reaches DONE.
#[derive(Debug, Clone)]
pub struct AgentTurn {
    /// Correlation id for logs.
    pub turn_id: String,

    /// The user's utterance, verbatim.
    pub user_input: String,

    /// The router's verdict.
    pub route: RouteDecision,

    /// Constructed parameters (tool turns only).
    pub parameters: Option<ParameterSet>,

    /// Execution result (tool turns only).
    pub execution: Option<ExecutionResult>,

    /// The user-facing reply.
    pub final_message: Option<String>,
}
