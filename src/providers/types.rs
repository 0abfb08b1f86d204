// Unified request/response types for the model invocation layer
//
// Stages build a ProviderRequest from a resolved instruction template and
// inspect the ProviderResponse's content blocks; provider implementations
// transform these into their specific wire format.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single conversation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Build a user message with a single text block.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    pub fn with_content(role: impl Into<String>, content: Vec<ContentBlock>) -> Self {
        Self {
            role: role.into(),
            content,
        }
    }
}

/// Content block - text, inline image, or a tool invocation by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "image")]
    Image {
        /// Mime type, e.g. "image/png"
        media_type: String,
        /// Base64-encoded payload
        data: String,
    },

    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
}

impl ContentBlock {
    pub fn is_tool_use(&self) -> bool {
        matches!(self, ContentBlock::ToolUse { .. })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// A tool the model may invoke as a side-effecting action instead of
/// (or in addition to) returning text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    /// A tool that takes no arguments.
    pub fn no_args(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {},
            }),
        }
    }
}

/// A tool invocation extracted from a response.
#[derive(Debug, Clone)]
pub struct ToolUse {
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// Unified request format for model providers.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<Message>,

    /// Model name; empty means "use the provider default"
    pub model: String,

    pub max_tokens: u32,

    /// Tools offered to the model for this invocation
    pub tools: Option<Vec<ToolDefinition>>,

    pub temperature: Option<f32>,

    /// Ask the provider to emit JSON only (structured-output mode)
    pub json_output: bool,
}

impl ProviderRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            model: String::new(),
            max_tokens: 2048,
            tools: None,
            temperature: None,
            json_output: false,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_json_output(mut self, json_output: bool) -> Self {
        self.json_output = json_output;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Unified response format from model providers.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub id: String,
    pub model: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
    /// Provider name, e.g. "gemini"
    pub provider: String,
}

impl ProviderResponse {
    /// Concatenated text of all text blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.as_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_tool_uses(&self) -> bool {
        self.content.iter().any(|block| block.is_tool_use())
    }

    pub fn tool_uses(&self) -> Vec<ToolUse> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, input } => Some(ToolUse {
                    id: id.clone(),
                    name: name.clone(),
                    input: input.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(content: Vec<ContentBlock>) -> ProviderResponse {
        ProviderResponse {
            id: "resp_1".to_string(),
            model: "gemini-2.0-flash".to_string(),
            content,
            stop_reason: Some("STOP".to_string()),
            provider: "gemini".to_string(),
        }
    }

    #[test]
    fn test_request_defaults() {
        let req = ProviderRequest::new(vec![Message::user("hi")]);
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.model, "");
        assert!(req.tools.is_none());
        assert!(!req.json_output);
    }

    #[test]
    fn test_request_builder_chain() {
        let req = ProviderRequest::new(vec![])
            .with_model("gemini-2.0-flash")
            .with_temperature(0.4)
            .with_json_output(true);
        assert_eq!(req.model, "gemini-2.0-flash");
        assert_eq!(req.temperature, Some(0.4));
        assert!(req.json_output);
    }

    #[test]
    fn test_response_text_joins_text_blocks() {
        let resp = make_response(vec![
            ContentBlock::Text {
                text: "Hello".to_string(),
            },
            ContentBlock::Text {
                text: "world".to_string(),
            },
        ]);
        assert_eq!(resp.text(), "Hello\nworld");
    }

    #[test]
    fn test_response_text_skips_non_text() {
        let resp = make_response(vec![ContentBlock::ToolUse {
            id: "t1".to_string(),
            name: "exit_loop".to_string(),
            input: serde_json::json!({}),
        }]);
        assert_eq!(resp.text(), "");
        assert!(resp.has_tool_uses());
    }

    #[test]
    fn test_tool_uses_extraction() {
        let resp = make_response(vec![
            ContentBlock::Text {
                text: "done".to_string(),
            },
            ContentBlock::ToolUse {
                id: "t1".to_string(),
                name: "exit_loop".to_string(),
                input: serde_json::json!({}),
            },
        ]);
        let uses = resp.tool_uses();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].name, "exit_loop");
    }

    #[test]
    fn test_no_args_tool_schema_shape() {
        let tool = ToolDefinition::no_args("exit_loop", "Stop the loop");
        assert_eq!(tool.input_schema["type"], "object");
        assert!(tool.input_schema["properties"]
            .as_object()
            .is_some_and(|p| p.is_empty()));
    }
}
