// Google Gemini API provider implementation
//
// Gemini uses a different message format from the unified types: "model"
// instead of "assistant", parts instead of content blocks, and function
// declarations for tools. Conversion happens here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::retry::with_retry;
use super::types::{ContentBlock, ProviderRequest, ProviderResponse};
use super::LlmProvider;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini API provider.
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
            default_model: "gemini-2.0-flash".to_string(),
        })
    }

    /// Create with custom default model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Override the API base URL (used by tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Convert ProviderRequest to Gemini API format
    fn to_gemini_request(&self, request: &ProviderRequest) -> GeminiRequest {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model.clone()
        };

        let contents: Vec<GeminiContent> = request
            .messages
            .iter()
            .map(|msg| {
                // Gemini uses "model" instead of "assistant"
                let role = if msg.role == "assistant" {
                    "model"
                } else {
                    &msg.role
                };

                let parts: Vec<GeminiPart> = msg
                    .content
                    .iter()
                    .map(|block| match block {
                        ContentBlock::Text { text } => GeminiPart::Text { text: text.clone() },
                        ContentBlock::Image { media_type, data } => GeminiPart::InlineData {
                            inline_data: GeminiBlob {
                                mime_type: media_type.clone(),
                                data: data.clone(),
                            },
                        },
                        ContentBlock::ToolUse { id: _, name, input } => GeminiPart::FunctionCall {
                            function_call: GeminiFunctionCall {
                                name: name.clone(),
                                args: input.clone(),
                            },
                        },
                    })
                    .collect();

                GeminiContent {
                    role: role.to_string(),
                    parts,
                }
            })
            .collect();

        let tools = request.tools.as_ref().map(|tool_defs| {
            vec![GeminiTools {
                function_declarations: tool_defs
                    .iter()
                    .map(|tool| GeminiFunctionDeclaration {
                        name: tool.name.clone(),
                        description: tool.description.clone(),
                        parameters: tool.input_schema.clone(),
                    })
                    .collect(),
            }]
        });

        let generation_config = GeminiGenerationConfig {
            temperature: request.temperature,
            max_output_tokens: Some(request.max_tokens as i32),
            response_mime_type: request.json_output.then(|| "application/json".to_string()),
        };

        GeminiRequest {
            model,
            contents,
            tools,
            generation_config: Some(generation_config),
        }
    }

    /// Convert Gemini response to ProviderResponse
    fn from_gemini_response(
        &self,
        response: GeminiResponse,
        model: String,
    ) -> Result<ProviderResponse> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .context("Gemini returned no candidates in response")?;

        let mut content = Vec::new();

        for part in candidate.content.parts {
            match part {
                GeminiPart::Text { text } => {
                    if !text.is_empty() {
                        content.push(ContentBlock::Text { text });
                    }
                }
                GeminiPart::FunctionCall { function_call } => {
                    // Gemini doesn't provide tool call ids; synthesize one
                    let unique_id = format!("gemini_{}_{}", function_call.name, Uuid::new_v4());
                    content.push(ContentBlock::ToolUse {
                        id: unique_id,
                        name: function_call.name,
                        input: function_call.args,
                    });
                }
                GeminiPart::InlineData { .. } => {
                    // Images never come back in responses; skip
                }
            }
        }

        Ok(ProviderResponse {
            id: "gemini-response".to_string(), // Gemini doesn't provide response IDs
            model,
            content,
            stop_reason: candidate.finish_reason,
            provider: "gemini".to_string(),
        })
    }

    /// Send a single request (no retry)
    async fn send_message_once(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let gemini_request = self.to_gemini_request(request);
        let model = gemini_request.model.clone();

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        tracing::debug!("Sending request to Gemini API: {:?}", gemini_request);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&gemini_request)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Gemini API request failed\n\nStatus: {}\nBody: {}",
                status,
                error_body
            );
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        tracing::debug!("Received response: {:?}", gemini_response);

        self.from_gemini_response(gemini_response, model)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        with_retry(|| self.send_message_once(request)).await
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn supports_tools(&self) -> bool {
        true
    }
}

// Gemini API types

#[derive(Debug, Clone, Serialize)]
struct GeminiRequest {
    #[serde(skip)]
    model: String, // Used in URL, not in body
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTools>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    role: String, // "user" or "model"
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiBlob,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: GeminiFunctionCall,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiBlob {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    args: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiTools {
    #[serde(rename = "functionDeclarations")]
    function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiFunctionDeclaration {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "responseMimeType")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::types::{Message, ToolDefinition};

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("test-key".to_string());
        assert!(provider.is_ok());
    }

    #[test]
    fn test_provider_name() {
        let provider = GeminiProvider::new("test-key".to_string()).unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_default_model() {
        let provider = GeminiProvider::new("test-key".to_string()).unwrap();
        assert_eq!(provider.default_model(), "gemini-2.0-flash");
    }

    #[test]
    fn test_custom_model() {
        let provider = GeminiProvider::new("test-key".to_string())
            .unwrap()
            .with_model("gemini-2.5-pro");
        assert_eq!(provider.default_model(), "gemini-2.5-pro");
    }

    #[test]
    fn test_request_conversion_maps_roles_and_parts() {
        let provider = GeminiProvider::new("k".to_string()).unwrap();
        let request = ProviderRequest::new(vec![
            Message::user("describe this"),
            Message::with_content(
                "assistant",
                vec![ContentBlock::Text {
                    text: "a draft".to_string(),
                }],
            ),
        ]);

        let gemini = provider.to_gemini_request(&request);
        assert_eq!(gemini.contents.len(), 2);
        assert_eq!(gemini.contents[0].role, "user");
        assert_eq!(gemini.contents[1].role, "model");
    }

    #[test]
    fn test_request_conversion_inlines_images() {
        let provider = GeminiProvider::new("k".to_string()).unwrap();
        let request = ProviderRequest::new(vec![Message::with_content(
            "user",
            vec![
                ContentBlock::Text {
                    text: "what is this".to_string(),
                },
                ContentBlock::Image {
                    media_type: "image/png".to_string(),
                    data: "aGVsbG8=".to_string(),
                },
            ],
        )]);

        let gemini = provider.to_gemini_request(&request);
        let body = serde_json::to_value(&gemini).unwrap();
        assert_eq!(
            body["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
    }

    #[test]
    fn test_request_conversion_declares_tools() {
        let provider = GeminiProvider::new("k".to_string()).unwrap();
        let request = ProviderRequest::new(vec![Message::user("refine or exit")])
            .with_tools(vec![ToolDefinition::no_args("exit_loop", "Stop iterating")]);

        let gemini = provider.to_gemini_request(&request);
        let body = serde_json::to_value(&gemini).unwrap();
        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            "exit_loop"
        );
    }

    #[test]
    fn test_json_output_sets_response_mime_type() {
        let provider = GeminiProvider::new("k".to_string()).unwrap();
        let request = ProviderRequest::new(vec![Message::user("analyze")]).with_json_output(true);

        let gemini = provider.to_gemini_request(&request);
        let body = serde_json::to_value(&gemini).unwrap();
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_response_conversion_synthesizes_tool_ids() {
        let provider = GeminiProvider::new("k".to_string()).unwrap();
        let response = GeminiResponse {
            candidates: vec![GeminiCandidate {
                content: GeminiContent {
                    role: "model".to_string(),
                    parts: vec![GeminiPart::FunctionCall {
                        function_call: GeminiFunctionCall {
                            name: "exit_loop".to_string(),
                            args: serde_json::json!({}),
                        },
                    }],
                },
                finish_reason: Some("STOP".to_string()),
            }],
        };

        let converted = provider
            .from_gemini_response(response, "gemini-2.0-flash".to_string())
            .unwrap();
        let uses = converted.tool_uses();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].name, "exit_loop");
        assert!(uses[0].id.starts_with("gemini_exit_loop_"));
    }

    #[test]
    fn test_response_conversion_rejects_empty_candidates() {
        let provider = GeminiProvider::new("k".to_string()).unwrap();
        let response = GeminiResponse { candidates: vec![] };
        assert!(provider
            .from_gemini_response(response, "gemini-2.0-flash".to_string())
            .is_err());
    }
}
