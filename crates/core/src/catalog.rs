//! Tool Catalog — the static registry of available tools.
//!
//! A [`ToolDescriptor`] describes one tool: its id, the trigger hints the
//! router embeds in its classification prompt, and the parameter schema the
//! constructor extracts against. The catalog is loaded once at process start
//! from configuration and never mutated afterwards, so it is safe to share
//! across concurrent turns without locking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamType::String => write!(f, "string"),
            ParamType::Number => write!(f, "number"),
            ParamType::Boolean => write!(f, "boolean"),
        }
    }
}

/// The schema entry for a single tool parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    /// The value type the constructor should extract.
    #[serde(rename = "type")]
    pub param_type: ParamType,

    /// Whether the parameter must be present in a valid parameter set.
    #[serde(default)]
    pub required: bool,

    /// Description shown to the model in the extraction prompt.
    #[serde(default)]
    pub description: String,
}

/// A single tool in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool id (e.g., "read_repo").
    pub id: String,

    /// The action verb reported in the parameter set (e.g., "read_repo",
    /// "insert_banner"). Used when the model omits one.
    pub action: String,

    /// Short phrases describing what requests should trigger this tool.
    /// Embedded verbatim in the router's classification prompt.
    #[serde(default)]
    pub trigger_hints: Vec<String>,

    /// Parameter schema, keyed by parameter name.
    ///
    /// BTreeMap keeps prompt ordering stable across runs, which matters for
    /// deterministic classification at temperature 0.0.
    #[serde(default)]
    pub params: BTreeMap<String, ParamSpec>,
}

impl ToolDescriptor {
    /// Names of all required parameters, in stable order.
    pub fn required_params(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// The immutable registry of tool descriptors.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: BTreeMap<String, ToolDescriptor>,
}

impl ToolCatalog {
    /// Build a catalog from descriptors. Later duplicates replace earlier
    /// ones.
    pub fn new(descriptors: impl IntoIterator<Item = ToolDescriptor>) -> Self {
        let tools = descriptors
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();
        Self { tools }
    }

    /// Look up a tool by id.
    pub fn get(&self, id: &str) -> Option<&ToolDescriptor> {
        self.tools.get(id)
    }

    /// Whether the catalog contains the given id.
    pub fn contains(&self, id: &str) -> bool {
        self.tools.contains_key(id)
    }

    /// All tool ids, in stable order.
    pub fn ids(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Iterate descriptors in stable order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
