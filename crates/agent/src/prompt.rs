//! System prompt builders for the three generative stages.
//!
//! Each builder embeds exactly the structured data its stage needs: the
//! router sees the catalog (ids + trigger hints), the constructor sees one
//! tool's parameter schema with a worked example, and the responder sees the
//! request/tool/result triple. Catalogs iterate in stable order so the same
//! catalog always produces the same prompt, which the deterministic stages
//! depend on.

use gitteach_core::catalog::{ParamType, ToolCatalog, ToolDescriptor};
use gitteach_core::turn::ExecutionResult;

/// Build the router's classification prompt.
pub fn router_prompt(catalog: &ToolCatalog) -> String {
    let mut prompt = String::from(
        "You are an intent classifier. You ONLY output JSON.\n\
         Tasks:\n\
         1. Analyze the user request.\n\
         2. Match it to a tool id from the catalog.\n\
         3. If no tool matches, use \"chat\".\n\n\
         CATALOG:\n",
    );

    for tool in catalog.iter() {
        prompt.push_str(&format!("- {}: {}.\n", tool.id, tool.trigger_hints.join(", ")));
    }

    prompt.push_str("\nEXAMPLES:\n");
    for tool in catalog.iter().filter(|t| !t.trigger_hints.is_empty()).take(2) {
        prompt.push_str(&format!(
            "User: \"{}\"\nJSON: {{\"tool\": \"{}\"}}\n\n",
            tool.trigger_hints[0], tool.id
        ));
    }
    prompt.push_str("User: \"Hello\"\nJSON: {\"tool\": \"chat\"}\n");

    prompt.push_str("\nRESPONSE FORMAT:\n{\"tool\": \"TOOL_ID_OR_CHAT\"}\n");
    prompt
}

/// Build the constructor's extraction prompt for one tool.
pub fn constructor_prompt(tool: &ToolDescriptor) -> String {
    let mut prompt = format!(
        "You are a parameter extractor for the \"{}\" tool.\n\
         Your only job is to read the user's text and fill in the JSON below.\n\n\
         PARAMETERS:\n",
        tool.id
    );

    for (name, spec) in &tool.params {
        let requirement = if spec.required { ", required" } else { "" };
        prompt.push_str(&format!(
            "- {} ({}{}): {}\n",
            name, spec.param_type, requirement, spec.description
        ));
    }

    prompt.push_str(&format!(
        "\nEXAMPLE:\nInput: \"a request mentioning the values to extract\"\nJSON:\n{}\n",
        worked_example(tool)
    ));

    prompt.push_str("\nYOUR TURN: Reply with ONLY the valid JSON.\n");
    prompt
}

/// One worked example for the extraction prompt, filled with placeholder
/// values of the right types.
fn worked_example(tool: &ToolDescriptor) -> String {
    let mut params = serde_json::Map::new();
    for (name, spec) in tool.params.iter().filter(|(_, s)| s.required) {
        let placeholder = match spec.param_type {
            ParamType::String => serde_json::json!("example"),
            ParamType::Number => serde_json::json!(42),
            ParamType::Boolean => serde_json::json!(true),
        };
        params.insert(name.clone(), placeholder);
    }

    let example = serde_json::json!({
        "action": tool.action,
        "toolId": tool.id,
        "params": params,
    });
    serde_json::to_string_pretty(&example).unwrap_or_default()
}

/// Build the responder's report prompt.
pub fn responder_prompt(user_input: &str, tool_id: &str, result: &ExecutionResult) -> String {
    let status = if result.success { "SUCCESS" } else { "FAILURE" };
    format!(
        "You are the GitTeach communication agent.\n\
         We just executed a technical action based on the user's request.\n\
         Your job is to report the result naturally and in a friendly tone.\n\n\
         CONTEXT:\n\
         - User request: \"{user_input}\"\n\
         - Tool executed: \"{tool_id}\"\n\
         - System result: \"{summary}\"\n\
         - Status: {status}\n\n\
         INSTRUCTIONS:\n\
         1. Briefly confirm what was done.\n\
         2. Do NOT mention JSON, internal tool names, or technical details.\n\
         3. Be concise.\n",
        summary = result.summary,
    )
}
