//! The agent orchestrator — the state machine over one turn.
//!
//! States: `ROUTING → (chat: DONE) | CONSTRUCTING → EXECUTING → RESPONDING
//! → DONE`, with a terminal `FAILED{stage, reason}` reachable from any
//! state. The four stages are strictly sequential; the only suspension
//! point in each is the backend call, bounded by its own timeout.
//!
//! Failure policy per stage:
//! - ROUTING: transport errors fail the turn; no automatic retry (repeating
//!   an identical classification call against a flaky backend changes
//!   nothing without backoff, which is the caller's concern).
//! - CONSTRUCTING: malformed output and schema violations fail the turn
//!   with the reason; no guessed defaults.
//! - EXECUTING: executor failures fail the turn; the responder is never
//!   reached with a fabricated success.
//! - RESPONDING: failures degrade to the templated confirmation, since the
//!   side effect is already committed and the user must be told.

use std::sync::Arc;

use gitteach_core::turn::{AgentTurn, RouteDecision, Stage, ToolExecutor, TurnFailure};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::constructor::ParameterConstructor;
use crate::responder::Responder;
use crate::router::IntentRouter;

/// Default reply for turns that route to chat.
const DEFAULT_CHAT_REPLY: &str = "How can I help with your profile README?";

/// The turn orchestrator.
pub struct Orchestrator {
    router: IntentRouter,
    constructor: ParameterConstructor,
    responder: Responder,
    executor: Arc<dyn ToolExecutor>,
    chat_reply: String,
}

impl Orchestrator {
    pub fn new(
        router: IntentRouter,
        constructor: ParameterConstructor,
        responder: Responder,
        executor: Arc<dyn ToolExecutor>,
    ) -> Self {
        Self {
            router,
            constructor,
            responder,
            executor,
            chat_reply: DEFAULT_CHAT_REPLY.into(),
        }
    }

    /// Set the canned reply returned for chat turns.
    pub fn with_chat_reply(mut self, reply: impl Into<String>) -> Self {
        self.chat_reply = reply.into();
        self
    }

    /// Process one turn from utterance to final message.
    ///
    /// Returns the completed [`AgentTurn`] on DONE, or the single structured
    /// [`TurnFailure`] on a fatal error. The turn aggregate is created here
    /// and discarded by the caller; nothing is shared between turns except
    /// the read-only catalog.
    pub async fn run(&self, user_input: &str) -> Result<AgentTurn, TurnFailure> {
        let turn_id = Uuid::new_v4().to_string();
        info!(turn_id = %turn_id, "Turn started");

        // ── ROUTING ──
        let route = self
            .router
            .route(user_input)
            .await
            .map_err(|e| TurnFailure::new(Stage::Routing, e))?;

        let tool_id = match &route {
            RouteDecision::Chat => {
                // Chat is inherently safe: no side effect, terminate early.
                info!(turn_id = %turn_id, "Routed to chat, turn done");
                return Ok(AgentTurn {
                    turn_id,
                    user_input: user_input.to_string(),
                    route,
                    parameters: None,
                    execution: None,
                    final_message: Some(self.chat_reply.clone()),
                });
            }
            RouteDecision::Tool { tool_id } => tool_id.clone(),
        };

        // ── CONSTRUCTING ──
        let parameters = self
            .constructor
            .construct(&tool_id, user_input)
            .await
            .map_err(|e| TurnFailure::new(Stage::Constructing, e))?;
        debug!(turn_id = %turn_id, tool_id = %tool_id, "Parameters constructed");

        // ── EXECUTING ──
        let execution = self
            .executor
            .execute(&parameters)
            .await
            .map_err(|e| TurnFailure::new(Stage::Executing, e))?;
        info!(
            turn_id = %turn_id,
            tool_id = %tool_id,
            success = execution.success,
            "Tool executed"
        );

        // ── RESPONDING ──
        let final_message = match self
            .responder
            .respond(user_input, &tool_id, &execution)
            .await
        {
            Ok(message) => message,
            Err(e) => {
                warn!(turn_id = %turn_id, error = %e, "Responder failed, using templated fallback");
                Responder::fallback_message(&execution)
            }
        };

        info!(turn_id = %turn_id, "Turn done");
        Ok(AgentTurn {
            turn_id,
            user_input: user_input.to_string(),
            route,
            parameters: Some(parameters),
            execution: Some(execution),
            final_message: Some(final_message),
        })
    }
}
