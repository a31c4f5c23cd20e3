//! Response generation — turn an execution result into a user-facing reply.
//!
//! This is the one stage where variability is acceptable and desired, so it
//! runs at a higher temperature than routing and construction. There is no
//! parsing step: the raw text is the output, subject only to a length and
//! sanity check. The templated fallback lives here too, so the orchestrator
//! can degrade without knowing how a confirmation is worded.

use std::sync::Arc;
use std::time::Duration;

use gitteach_core::completion::{CompletionClient, CompletionRequest};
use gitteach_core::error::{Error, RespondError};
use gitteach_core::turn::ExecutionResult;

use crate::prompt;

/// The natural-language responder.
pub struct Responder {
    client: Arc<dyn CompletionClient>,
    temperature: f32,
    max_reply_chars: usize,
    timeout: Duration,
}

impl Responder {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        temperature: f32,
        max_reply_chars: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            temperature,
            max_reply_chars,
            timeout,
        }
    }

    /// Generate the user-facing confirmation for an executed tool.
    pub async fn respond(
        &self,
        user_input: &str,
        tool_id: &str,
        result: &ExecutionResult,
    ) -> Result<String, Error> {
        let request = CompletionRequest::new(
            prompt::responder_prompt(user_input, tool_id, result),
            user_input,
            self.temperature,
            self.timeout,
        );

        let raw = self.client.complete(request).await?;
        let reply = raw.trim();

        if reply.is_empty() {
            return Err(RespondError::Empty.into());
        }
        let len = reply.chars().count();
        if len > self.max_reply_chars {
            return Err(RespondError::TooLong {
                len,
                max_chars: self.max_reply_chars,
            }
            .into());
        }

        Ok(reply.to_string())
    }

    /// The templated confirmation used when `respond` fails.
    ///
    /// By the time this is needed the side effect has already happened, so
    /// the user must be told something even if the model cannot word it.
    pub fn fallback_message(result: &ExecutionResult) -> String {
        if result.success {
            format!("Done. {}", result.summary)
        } else {
            format!("The action could not be completed: {}", result.summary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedClient;

    fn success_result() -> ExecutionResult {
        ExecutionResult {
            tool_id: "welcome_header".into(),
            success: true,
            summary: "Banner 'welcome_header' inserted with color blue.".into(),
        }
    }

    fn responder_with(client: Arc<ScriptedClient>) -> Responder {
        Responder::new(client, 0.7, 200, Duration::from_secs(30))
    }

    #[tokio::test]
    async fn returns_trimmed_reply() {
        let client = Arc::new(ScriptedClient::replies(&[
            "  ¡Listo! Tu banner azul ya está en el README.  \n",
        ]));
        let responder = responder_with(client);
        let reply = responder
            .respond("Pon un banner azul", "welcome_header", &success_result())
            .await
            .unwrap();
        assert_eq!(reply, "¡Listo! Tu banner azul ya está en el README.");
    }

    #[tokio::test]
    async fn empty_reply_is_invalid() {
        let client = Arc::new(ScriptedClient::replies(&["   \n"]));
        let responder = responder_with(client);
        let err = responder
            .respond("input", "welcome_header", &success_result())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Respond(RespondError::Empty)));
    }

    #[tokio::test]
    async fn oversized_reply_is_invalid() {
        let long_reply = "x".repeat(500);
        let client = Arc::new(ScriptedClient::replies(&[long_reply.as_str()]));
        let responder = responder_with(client);
        let err = responder
            .respond("input", "welcome_header", &success_result())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Respond(RespondError::TooLong { len: 500, max_chars: 200 })
        ));
    }

    #[tokio::test]
    async fn responder_uses_configured_temperature() {
        let client = Arc::new(ScriptedClient::replies(&["All done!"]));
        let responder = responder_with(client.clone());
        responder
            .respond("input", "welcome_header", &success_result())
            .await
            .unwrap();
        assert_eq!(client.recorded_temperatures(), vec![0.7]);
    }

    #[test]
    fn fallback_is_built_from_summary() {
        let message = Responder::fallback_message(&success_result());
        assert!(message.contains("Banner 'welcome_header' inserted with color blue."));

        let failed = ExecutionResult {
            tool_id: "read_repo".into(),
            success: false,
            summary: "README not found".into(),
        };
        let message = Responder::fallback_message(&failed);
        assert!(message.contains("could not be completed"));
        assert!(message.contains("README not found"));
    }
}
