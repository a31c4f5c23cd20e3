//! Parameter construction — extract a validated parameter set for a routed
//! tool.
//!
//! Extraction runs at temperature 0.0 like routing. The contract tolerates
//! over-generation but not under-generation: fields the model returns that
//! are not in the schema are dropped, while missing required fields fail the
//! call with the missing names. Guessing defaults is deliberately off the
//! table; a wrong guessed parameter is a worse user-visible outcome than an
//! explicit failure.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use gitteach_core::catalog::ToolCatalog;
use gitteach_core::completion::{CompletionClient, CompletionRequest};
use gitteach_core::error::{Error, ParameterError};
use gitteach_core::turn::ParameterSet;
use tracing::debug;

use crate::parser::parse_json_object;
use crate::prompt;

/// Extraction temperature, fixed at maximal determinism.
const EXTRACTION_TEMPERATURE: f32 = 0.0;

/// The parameter constructor.
pub struct ParameterConstructor {
    client: Arc<dyn CompletionClient>,
    catalog: Arc<ToolCatalog>,
    timeout: Duration,
}

impl ParameterConstructor {
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

    /// Construct a parameter set for `tool_id` from the utterance.
    ///
    /// The returned set's `tool_id` is always the routed id passed in here;
    /// whatever id the model echoes back is ignored.
    pub async fn construct(&self, tool_id: &str, user_input: &str) -> Result<ParameterSet, Error> {
        let tool = self
            .catalog
            .get(tool_id)
            .ok_or_else(|| ParameterError::UnknownTool(tool_id.to_string()))?;

        let request = CompletionRequest::new(
            prompt::constructor_prompt(tool),
            user_input,
            EXTRACTION_TEMPERATURE,
            self.timeout,
        );

        let raw = self.client.complete(request).await?;
        let value = parse_json_object(&raw)?;

        let action = value
            .get("action")
            .and_then(|a| a.as_str())
            .unwrap_or(&tool.action)
            .to_string();

        let returned = value
            .get("params")
            .and_then(|p| p.as_object())
            .cloned()
            .unwrap_or_default();

        // Keep only schema fields with primitive values; drop the rest.
        let mut params = BTreeMap::new();
        for name in tool.params.keys() {
            if let Some(v) = returned.get(name) {
                if v.is_string() || v.is_number() || v.is_boolean() {
                    params.insert(name.clone(), v.clone());
                } else {
                    debug!(param = %name, "Dropping non-primitive parameter value");
                }
            }
        }

        let missing: Vec<String> = tool
            .params
            .iter()
            .filter(|(name, spec)| spec.required && !params.contains_key(*name))
            .map(|(name, _)| name.clone())
            .collect();

        if !missing.is_empty() {
            return Err(ParameterError::Incomplete { missing }.into());
        }

        Ok(ParameterSet {
            tool_id: tool_id.to_string(),
            action,
            params,
        })
    }
}
