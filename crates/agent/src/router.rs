//! Intent routing — classify an utterance into a tool id or the chat
//! fallback.
//!
//! Classification runs at temperature 0.0: repeated calls for the same
//! utterance against a deterministic backend must return the same decision.
//! The returned id is validated against the catalog before anything
//! downstream sees it. An unparseable or unrecognized classification falls
//! closed to chat, never forward to the constructor; only transport errors
//! propagate, because they mean the whole turn cannot proceed.

use std::sync::Arc;
use std::time::Duration;

use gitteach_core::catalog::ToolCatalog;
use gitteach_core::completion::{CompletionClient, CompletionRequest};
use gitteach_core::error::CompletionError;
use gitteach_core::turn::RouteDecision;
use tracing::{debug, warn};

use crate::parser::parse_json_object;
use crate::prompt;

/// Classification temperature. Non-zero would make routing nondeterministic,
/// which is a correctness bug here, not a tuning choice.
const ROUTING_TEMPERATURE: f32 = 0.0;

/// The intent router.
pub struct IntentRouter {
    client: Arc<dyn CompletionClient>,
    catalog: Arc<ToolCatalog>,
    timeout: Duration,
}

impl IntentRouter {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        catalog: Arc<ToolCatalog>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            catalog,
            timeout,
        }
    }

    /// Classify one utterance.
    ///
    /// Transport errors propagate; everything else resolves to a decision,
    /// falling closed to [`RouteDecision::Chat`] when the model's output
    /// cannot be trusted.
    pub async fn route(&self, user_input: &str) -> Result<RouteDecision, CompletionError> {
        let request = CompletionRequest::new(
            prompt::router_prompt(&self.catalog),
            user_input,
            ROUTING_TEMPERATURE,
            self.timeout,
        );

        let raw = self.client.complete(request).await?;
        Ok(self.decide(&raw))
    }

    /// Turn raw classifier output into a validated decision.
    fn decide(&self, raw: &str) -> RouteDecision {
        let value = match parse_json_object(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Unparseable classification, failing closed to chat");
                return RouteDecision::Chat;
            }
        };

        match value.get("tool").and_then(|t| t.as_str()) {
            Some("chat") => RouteDecision::Chat,
            Some(id) if self.catalog.contains(id) => {
                debug!(tool_id = id, "Routed to tool");
                RouteDecision::Tool {
                    tool_id: id.to_string(),
                }
            }
            Some(id) => {
                warn!(tool_id = id, "Unrecognized tool id, failing closed to chat");
                RouteDecision::Chat
            }
            None => {
                warn!("Classification has no 'tool' field, failing closed to chat");
                RouteDecision::Chat
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{fixture_catalog, ScriptedClient};

    fn router_with(replies: &[&str]) -> IntentRouter {
        IntentRouter::new(
            Arc::new(ScriptedClient::replies(replies)),
            Arc::new(fixture_catalog()),
            Duration::from_secs(30),
        )
    }

    #[tokio::test]
    async fn routes_to_catalog_tool() {
        let router = router_with(&[r#"{"tool": "welcome_header"}"#]);
        let decision = router.route("Pon un banner estilo shark color azul").await.unwrap();
        assert_eq!(
            decision,
            RouteDecision::Tool {
                tool_id: "welcome_header".into()
            }
        );
    }

    #[tokio::test]
    async fn routes_to_chat() {
        let router = router_with(&[r#"{"tool": "chat"}"#]);
        let decision = router.route("Hola").await.unwrap();
        assert_eq!(decision, RouteDecision::Chat);
    }

    #[tokio::test]
    async fn fenced_classification_is_accepted() {
        let router = router_with(&["```json\n{\"tool\": \"github_stats\"}\n```"]);
        let decision = router.route("Pon mis estadísticas").await.unwrap();
        assert_eq!(
            decision,
            RouteDecision::Tool {
                tool_id: "github_stats".into()
            }
        );
    }

    #[tokio::test]
    async fn unknown_tool_id_fails_closed_to_chat() {
        let router = router_with(&[r#"{"tool": "not_a_real_tool"}"#]);
        let decision = router.route("do something").await.unwrap();
        assert_eq!(decision, RouteDecision::Chat);
    }

    #[tokio::test]
    async fn prose_reply_fails_closed_to_chat() {
        let router = router_with(&["I think you want a banner"]);
        let decision = router.route("banner please").await.unwrap();
        assert_eq!(decision, RouteDecision::Chat);
    }

    #[tokio::test]
    async fn missing_tool_field_fails_closed_to_chat() {
        let router = router_with(&[r#"{"intent": "welcome_header"}"#]);
        let decision = router.route("banner please").await.unwrap();
        assert_eq!(decision, RouteDecision::Chat);
    }

    #[tokio::test]
    async fn repeated_routing_is_idempotent() {
        let reply = r#"{"tool": "welcome_header"}"#;
        let router = router_with(&[reply, reply, reply]);
        let mut decisions = Vec::new();
        for _ in 0..3 {
            decisions.push(router.route("Pon un banner").await.unwrap());
        }
        assert!(decisions.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn routing_uses_temperature_zero() {
        let client = Arc::new(ScriptedClient::replies(&[r#"{"tool": "chat"}"#]));
        let router = IntentRouter::new(
            client.clone(),
            Arc::new(fixture_catalog()),
            Duration::from_secs(30),
        );
        router.route("Hola").await.unwrap();
        assert_eq!(client.recorded_temperatures(), vec![0.0]);
    }

    #[tokio::test]
    async fn transport_error_propagates() {
        let client = Arc::new(ScriptedClient::failing(CompletionError::Timeout {
            timeout_secs: 30,
        }));
        let router = IntentRouter::new(
            client,
            Arc::new(fixture_catalog()),
            Duration::from_secs(30),
        );
        let err = router.route("Hola").await.unwrap_err();
        assert!(matches!(err, CompletionError::Timeout { .. }));
    }
}
