//! OpenAI-compatible completion client.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, LM Studio, and any local
//! server exposing a `/v1/chat/completions` endpoint.
//!
//! One `complete()` call is one outbound POST. The timeout applies to that
//! call only, so a single slow classification never blocks an unrelated
//! turn. The client never retries; the orchestrator decides what a failure
//! means at each stage.

use async_trait::async_trait;
use gitteach_core::completion::{CompletionClient, CompletionRequest};
use gitteach_core::error::CompletionError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A client for OpenAI-compatible chat-completion backends.
pub struct OpenAiCompatClient {
    name: String,
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    /// Create a new OpenAI-compatible client.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            model: model.into(),
            client,
        }
    }

    /// Set the API key. Local servers typically need none.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Create a client for a local server (convenience constructor).
    pub fn local(model: impl Into<String>) -> Self {
        Self::new("local", "http://localhost:8000/v1", model)
    }

    /// The model sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let timeout_secs = request.timeout.as_secs();

        let body = ApiRequest {
            model: self.model.clone(),
            messages: vec![
                ApiMessage {
                    role: "system".into(),
                    content: request.system_prompt,
                },
                ApiMessage {
                    role: "user".into(),
                    content: request.user_input,
                },
            ],
            temperature: request.temperature,
        };

        debug!(
            backend = %self.name,
            model = %self.model,
            temperature = request.temperature,
            "Sending completion request"
        );

        let mut builder = self.client.post(&url).timeout(request.timeout).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                CompletionError::Timeout { timeout_secs }
            } else {
                CompletionError::Unreachable(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let message = response.text().await.unwrap_or_default();
            warn!(status, body = %message, "Backend returned error");
            return Err(CompletionError::Backend {
                status_code: status,
                message,
            });
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            // A 2xx with an unexpected body shape is still a backend error.
            CompletionError::Backend {
                status_code: status,
                message: format!("Failed to parse response: {e}"),
            }
        })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::Backend {
                status_code: status,
                message: "No choices in response".into(),
            })?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_constructor() {
        let client = OpenAiCompatClient::local("lfm2.5");
        assert_eq!(client.name(), "local");
        assert_eq!(client.model(), "lfm2.5");
        assert!(client.base_url.contains("localhost:8000"));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = OpenAiCompatClient::new("test", "http://host/v1/", "m");
        assert_eq!(client.base_url, "http://host/v1");
    }

    #[test]
    fn request_body_shape() {
        let body = ApiRequest {
            model: "lfm2.5".into(),
            messages: vec![
                ApiMessage {
                    role: "system".into(),
                    content: "You are an Intent Classifier.".into(),
                },
                ApiMessage {
                    role: "user".into(),
                    content: "Hola".into(),
                },
            ],
            temperature: 0.0,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "lfm2.5");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["temperature"], 0.0);
    }

    #[test]
    fn parse_success_response() {
        let data = r#"{"choices":[{"message":{"role":"assistant","content":"{\"tool\": \"chat\"}"}}]}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some(r#"{"tool": "chat"}"#)
        );
    }

    #[test]
    fn parse_response_without_content() {
        let data = r#"{"choices":[{"message":{"role":"assistant"}}]}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn unreachable_backend_maps_to_unreachable() {
        // Nothing listens on this port; connection must be refused.
        let client = OpenAiCompatClient::new("test", "http://127.0.0.1:1", "m");
        let request = CompletionRequest::new(
            "system",
            "user",
            0.0,
            std::time::Duration::from_secs(5),
        );
        let err = client.complete(request).await.unwrap_err();
        assert!(matches!(err, CompletionError::Unreachable(_)), "got {err:?}");
    }
}
