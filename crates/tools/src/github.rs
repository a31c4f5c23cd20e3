//! GitHub toolbox — repository listing and README retrieval.
//!
//! Executes the `list_repos` and `read_repo` tools against the GitHub REST
//! API. README content arrives base64-encoded and is decoded before being
//! summarized; long READMEs are truncated so the summary stays inside the
//! responder's context window.

use async_trait::async_trait;
use base64::Engine as _;
use gitteach_core::error::ExecutionError;
use gitteach_core::turn::{ExecutionResult, ParameterSet, ToolExecutor};
use serde::Deserialize;
use tracing::{debug, warn};

/// Maximum README characters carried into a result summary.
const README_SUMMARY_LIMIT: usize = 3000;

/// Tool executor backed by the GitHub REST API.
pub struct GithubToolbox {
    /// Default account for listing and README reads.
    user: String,
    api_base: String,
    client: reqwest::Client,
}

impl GithubToolbox {
    pub fn new(user: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            user: user.into(),
            api_base: "https://api.github.com".into(),
            client,
        }
    }

    /// Override the API base URL (tests point this at a local server).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        tool_id: &str,
    ) -> Result<T, ExecutionError> {
        let response = self
            .client
            .get(url)
            // GitHub rejects requests without a User-Agent.
            .header("User-Agent", "gitteach")
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| ExecutionError::Failed {
                tool_id: tool_id.to_string(),
                reason: format!("GitHub request failed: {e}"),
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            warn!(status, url, "GitHub API error");
            return Err(ExecutionError::Failed {
                tool_id: tool_id.to_string(),
                reason: format!("GitHub API returned status {status}"),
            });
        }

        response.json().await.map_err(|e| ExecutionError::Failed {
            tool_id: tool_id.to_string(),
            reason: format!("Unexpected GitHub response shape: {e}"),
        })
    }

    async fn list_repos(&self) -> Result<ExecutionResult, ExecutionError> {
        let url = format!("{}/users/{}/repos", self.api_base, self.user);
        debug!(user = %self.user, "Listing repositories");

        let repos: Vec<Repo> = self.get_json(&url, "list_repos").await?;
        let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();

        Ok(ExecutionResult {
            tool_id: "list_repos".into(),
            success: true,
            summary: format!(
                "Found {} public repositories: {}",
                names.len(),
                names.join(", ")
            ),
        })
    }

    async fn read_repo(&self, params: &ParameterSet) -> Result<ExecutionResult, ExecutionError> {
        let repo = params
            .get_str("repo")
            .ok_or_else(|| ExecutionError::Failed {
                tool_id: "read_repo".into(),
                reason: "missing 'repo' parameter".into(),
            })?;
        let owner = params.get_str("owner").unwrap_or(&self.user);

        let url = format!("{}/repos/{}/{}/readme", self.api_base, owner, repo);
        debug!(owner, repo, "Fetching README");

        let readme: Readme = self.get_json(&url, "read_repo").await?;

        // GitHub wraps the base64 payload across lines.
        let cleaned: String = readme.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(cleaned)
            .map_err(|e| ExecutionError::Failed {
                tool_id: "read_repo".into(),
                reason: format!("README content is not valid base64: {e}"),
            })?;
        let content = String::from_utf8_lossy(&bytes);

        let truncated: String = content.chars().take(README_SUMMARY_LIMIT).collect();
        Ok(ExecutionResult {
            tool_id: "read_repo".into(),
            success: true,
            summary: format!("Content of {owner}/{repo}/README.md:\n{truncated}"),
        })
    }
}

#[async_trait]
impl ToolExecutor for GithubToolbox {
    async fn execute(&self, params: &ParameterSet) -> Result<ExecutionResult, ExecutionError> {
        match params.tool_id.as_str() {
            "list_repos" => self.list_repos().await,
            "read_repo" => self.read_repo(params).await,
            other => Err(ExecutionError::Failed {
                tool_id: other.to_string(),
                reason: "tool not supported by the GitHub toolbox".into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Repo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Readme {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn params(tool_id: &str, entries: &[(&str, &str)]) -> ParameterSet {
        ParameterSet {
            tool_id: tool_id.into(),
            action: tool_id.into(),
            params: entries
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::json!(v)))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn repo_list_deserializes() {
        let data = r#"[{"name": "intro-electron", "fork": false}, {"name": "dotfiles"}]"#;
        let repos: Vec<Repo> = serde_json::from_str(data).unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].name, "intro-electron");
    }

    #[test]
    fn readme_payload_decodes_across_line_breaks() {
        // "# Intro to Electron" encoded with a GitHub-style line break.
        let encoded = "IyBJbnRybyB0\nbyBFbGVjdHJvbg==";
        let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(cleaned)
            .unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "# Intro to Electron");
    }

    #[tokio::test]
    async fn missing_repo_parameter_fails() {
        let toolbox = GithubToolbox::new("mauro3422");
        let err = toolbox
            .execute(&params("read_repo", &[]))
            .await
            .unwrap_err();
        let ExecutionError::Failed { tool_id, reason } = err;
        assert_eq!(tool_id, "read_repo");
        assert!(reason.contains("repo"));
    }

    #[tokio::test]
    async fn unsupported_tool_fails() {
        let toolbox = GithubToolbox::new("mauro3422");
        let err = toolbox
            .execute(&params("welcome_header", &[("color", "blue")]))
            .await
            .unwrap_err();
        let ExecutionError::Failed { tool_id, .. } = err;
        assert_eq!(tool_id, "welcome_header");
    }

    #[tokio::test]
    async fn unreachable_api_reports_failure_not_panic() {
        let toolbox =
            GithubToolbox::new("mauro3422").with_api_base("http://127.0.0.1:1");
        let err = toolbox
            .execute(&params("read_repo", &[("repo", "intro-electron")]))
            .await
            .unwrap_err();
        let ExecutionError::Failed { reason, .. } = err;
        assert!(reason.contains("GitHub request failed"));
    }
}
