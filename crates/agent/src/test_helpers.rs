//! Shared test helpers for pipeline tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use gitteach_core::catalog::{ParamSpec, ParamType, ToolCatalog, ToolDescriptor};
use gitteach_core::completion::{CompletionClient, CompletionRequest};
use gitteach_core::error::{CompletionError, ExecutionError};
use gitteach_core::turn::{ExecutionResult, ParameterSet, ToolExecutor};

/// A deterministic stub backend that returns a queue of scripted replies.
///
/// Each call to `complete` pops the next reply and records the request.
/// Panics if more calls are made than replies were provided.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A client that returns the given replies in order.
    pub fn replies(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    /// A client whose first call fails with the given error.
    pub fn failing(error: CompletionError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// How many completions have been requested so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Temperatures of all requests seen, in call order.
    pub fn recorded_temperatures(&self) -> Vec<f32> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.temperature)
            .collect()
    }

    /// System prompt of the request at `index`.
    pub fn system_prompt(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index].system_prompt.clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedClient: no more scripted replies"))
    }
}

/// The fixture catalog used across pipeline tests:
/// a banner tool with a parameter schema and a parameterless stats tool.
pub fn fixture_catalog() -> ToolCatalog {
    let mut banner_params = BTreeMap::new();
    banner_params.insert(
        "type".to_string(),
        ParamSpec {
            param_type: ParamType::String,
            required: true,
            description: "banner style (waving, shark, ...)".into(),
        },
    );
    banner_params.insert(
        "color".to_string(),
        ParamSpec {
            param_type: ParamType::String,
            required: true,
            description: "banner color (red, blue, hex)".into(),
        },
    );
    banner_params.insert(
        "text".to_string(),
        ParamSpec {
            param_type: ParamType::String,
            required: false,
            description: "custom text".into(),
        },
    );

    ToolCatalog::new(vec![
        ToolDescriptor {
            id: "welcome_header".into(),
            action: "insert_banner".into(),
            trigger_hints: vec!["welcome banner".into(), "header".into(), "hola".into()],
            params: banner_params,
        },
        ToolDescriptor {
            id: "github_stats".into(),
            action: "github_stats".into(),
            trigger_hints: vec!["stats".into(), "score".into(), "performance".into()],
            params: BTreeMap::new(),
        },
    ])
}

/// An executor stub that records calls and reports success.
#[derive(Default)]
pub struct StubExecutor {
    calls: Mutex<Vec<ParameterSet>>,
}

impl StubExecutor {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<ParameterSet> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ToolExecutor for StubExecutor {
    async fn execute(&self, params: &ParameterSet) -> Result<ExecutionResult, ExecutionError> {
        self.calls.lock().unwrap().push(params.clone());
        let color = params.get_str("color").unwrap_or("auto");
        Ok(ExecutionResult {
            tool_id: params.tool_id.clone(),
            success: true,
            summary: format!(
                "Banner '{}' inserted with color {}.",
                params.tool_id, color
            ),
        })
    }
}

/// An executor stub that always fails.
pub struct FailingExecutor;

#[async_trait]
impl ToolExecutor for FailingExecutor {
    async fn execute(&self, params: &ParameterSet) -> Result<ExecutionResult, ExecutionError> {
        Err(ExecutionError::Failed {
            tool_id: params.tool_id.clone(),
            reason: "executor unavailable".into(),
        })
    }
}
