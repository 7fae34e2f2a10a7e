//! Google Gemini `generateContent` backend.

use super::{ChatRequest, ChatResponse, LlmBackend, Role, Usage};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    contents: Vec<ApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct ApiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<ApiPart>,
}

#[derive(Debug, Serialize)]
struct ApiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: ApiUsage,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

// Non-text parts (thought signatures, function calls) carry no `text`.
#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Builder for creating a Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiBackendBuilder {
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl GeminiBackendBuilder {
    /// Create a new builder with an API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_URL.to_string(),
            max_tokens: 4096,
        }
    }

    /// Point the backend at a different API root.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the maximum tokens for responses.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the backend.
    pub fn build(self) -> GeminiBackend {
        GeminiBackend {
            client: reqwest::Client::new(),
            api_key: self.api_key,
            model: self.model,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            max_tokens: self.max_tokens,
        }
    }
}

/// Gemini API backend.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl GeminiBackend {
    /// Create a builder for the Gemini backend.
    pub fn builder(api_key: impl Into<String>, model: impl Into<String>) -> GeminiBackendBuilder {
        GeminiBackendBuilder::new(api_key, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn role_to_api_str(role: Role) -> &'static str {
        match role {
            Role::User => "user",
            Role::Assistant => "model",
        }
    }

    fn build_request(&self, request: &ChatRequest<'_>) -> ApiRequest {
        let contents = request
            .messages
            .iter()
            .map(|m| ApiContent {
                role: Some(Self::role_to_api_str(m.role)),
                parts: vec![ApiPart {
                    text: m.content.clone(),
                }],
            })
            .collect();

        ApiRequest {
            contents,
            system_instruction: request.system.map(|s| ApiContent {
                role: None,
                parts: vec![ApiPart {
                    text: s.to_string(),
                }],
            }),
            generation_config: GenerationConfig {
                max_output_tokens: self.max_tokens,
            },
        }
    }
}

impl std::fmt::Display for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gemini({})", self.model)
    }
}

impl LlmBackend for GeminiBackend {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse> {
        let api_request = self.build_request(&request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!("{status}: {body}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Api(e.to_string()))?;

        let chat_response = into_chat_response(api_response)?;
        debug!(
            model = %self.model,
            input_tokens = chat_response.usage.input_tokens,
            output_tokens = chat_response.usage.output_tokens,
            "gemini response"
        );
        Ok(chat_response)
    }
}

/// Join the text parts of the first candidate.
fn into_chat_response(api_response: ApiResponse) -> Result<ChatResponse> {
    let usage = Usage {
        input_tokens: api_response.usage_metadata.prompt_token_count,
        output_tokens: api_response.usage_metadata.candidates_token_count,
    };

    let Some(candidate) = api_response.candidates.into_iter().next() else {
        let reason = api_response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(Error::Api(format!("empty response: {reason}")));
    };

    let content = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default();

    if content.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(Error::Api(format!("response has no text (finish reason: {reason})")));
    }

    Ok(ChatResponse {
        content: content.trim().to_string(),
        usage,
    })
}
