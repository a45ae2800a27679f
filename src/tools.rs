//! Function-tool definitions and the built-in Responses-API tool
//! constructors (`web_search`, `x_search`, `code_execution`).
//!
//! A tool entry on the wire is always a plain
//! `{"type":"function","function":{...}}` object; the three built-in
//! constructors below are themselves function tools with a fixed schema,
//! not a separate wire shape. This crate does not dispatch tool calls
//! itself: `arguments` is kept as a raw JSON string on both the request and
//! response side, leaving execution to the caller.

use serde::Serialize;
use serde_json::{json, Value};

/// A callable function exposed to the model.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl FunctionDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), description: None, parameters: None }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// One entry in a request's `tools` array. xAI only defines the `function`
/// kind; `web_search`/`x_search`/`code_execution` below are themselves
/// function tools with a fixed schema, not separate wire variants.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolDefinition {
    Function { function: FunctionDefinition },
}

impl ToolDefinition {
    pub fn function(def: FunctionDefinition) -> Self {
        ToolDefinition::Function { function: def }
    }

    /// Server-side web search tool for the Responses endpoint.
    pub fn web_search() -> Self {
        ToolDefinition::function(
            FunctionDefinition::new("web_search")
                .with_description("Search the web and return relevant results")
                .with_parameters(json!({
                    "type": "object",
                    "properties": {
                        "query": { "type": "string" },
                        "allowed_domains": { "type": "array", "items": { "type": "string" } },
                        "excluded_domains": { "type": "array", "items": { "type": "string" } },
                        "enable_image_understanding": { "type": "boolean" },
                    },
                    "required": ["query"],
                })),
        )
    }

    /// Server-side X (Twitter) search tool for the Responses endpoint.
    pub fn x_search() -> Self {
        ToolDefinition::function(
            FunctionDefinition::new("x_search")
                .with_description("Search X posts and return relevant results")
                .with_parameters(json!({
                    "type": "object",
                    "properties": {
                        "query": { "type": "string" },
                        "allowed_handles": { "type": "array", "items": { "type": "string" } },
                        "from_date": { "type": "string" },
                        "to_date": { "type": "string" },
                    },
                    "required": ["query"],
                })),
        )
    }

    /// Server-side sandboxed code execution tool for the Responses endpoint.
    pub fn code_execution() -> Self {
        ToolDefinition::function(
            FunctionDefinition::new("code_execution")
                .with_description("Execute a snippet of code in a sandbox and return its output")
                .with_parameters(json!({
                    "type": "object",
                    "properties": {
                        "code": { "type": "string" },
                    },
                    "required": ["code"],
                })),
        )
    }
}

/// How the model should pick a tool, matching the request builder's
/// `tool_choice` handling (string sentinels or a forced-function object).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ToolChoice {
    Mode(ToolChoiceMode),
    Function { #[serde(rename = "type")] kind: ToolChoiceKind, function: ToolChoiceFunction },
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoiceMode {
    Auto,
    None,
    Required,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoiceKind {
    Function,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolChoiceFunction {
    pub name: String,
}

impl ToolChoice {
    pub fn auto() -> Self {
        ToolChoice::Mode(ToolChoiceMode::Auto)
    }

    pub fn none() -> Self {
        ToolChoice::Mode(ToolChoiceMode::None)
    }

    pub fn required() -> Self {
        ToolChoice::Mode(ToolChoiceMode::Required)
    }

    pub fn function(name: impl Into<String>) -> Self {
        ToolChoice::Function {
            kind: ToolChoiceKind::Function,
            function: ToolChoiceFunction { name: name.into() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_search_tool_has_required_query_param() {
        let tool = ToolDefinition::web_search();
        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "web_search");
        assert_eq!(json["function"]["parameters"]["required"][0], "query");
    }

    #[test]
    fn tool_choice_mode_serializes_as_bare_string() {
        let choice = ToolChoice::auto();
        assert_eq!(serde_json::to_value(&choice).unwrap(), "auto");
    }

    #[test]
    fn tool_choice_function_serializes_as_object() {
        let choice = ToolChoice::function("get_weather");
        let json = serde_json::to_value(&choice).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "get_weather");
    }
}
