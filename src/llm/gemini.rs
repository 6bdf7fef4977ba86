// ABOUTME: Google Gemini provider adapter speaking the generateContent format
// ABOUTME: Maps generic chat requests onto the Gemini REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # Gemini Provider
//!
//! Adapter for the Google Gemini API. Gemini differs from the OpenAI-style
//! providers in three ways: the key travels as a URL query parameter rather
//! than a header, system prompts go in a dedicated `system_instruction`
//! field, and the assistant role is called `model`.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, MessageRole, TokenUsage};
use crate::errors::PlannerError;

/// Environment variable for the Gemini API key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default model for meal generation
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Models available on the Gemini API
pub const AVAILABLE_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-pro",
    "gemini-2.0-flash",
];

/// Gemini API base URL
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const PROVIDER_NAME: &str = "gemini";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini chat completion provider
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    default_model: String,
}

// ============================================================================
// Wire Format
// ============================================================================

// Request fields serialize in snake_case; the API accepts both naming
// conventions. Response fields arrive in camelCase and need renames.

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    candidate_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt_token_count: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates_token_count: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Conversion
// ============================================================================

const fn convert_role(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System | MessageRole::User => "user",
        MessageRole::Assistant => "model",
    }
}

/// Split system messages into `system_instruction`; the rest become contents
fn convert_messages(messages: &[ChatMessage]) -> (Vec<GeminiContent>, Option<GeminiContent>) {
    let mut contents = Vec::new();
    let mut system_parts = Vec::new();

    for message in messages {
        let part = ContentPart {
            text: message.content.clone(),
        };
        if message.role == MessageRole::System {
            system_parts.push(part);
        } else {
            contents.push(GeminiContent {
                role: Some(convert_role(message.role).to_owned()),
                parts: vec![part],
            });
        }
    }

    let system_instruction = if system_parts.is_empty() {
        None
    } else {
        Some(GeminiContent {
            role: None,
            parts: system_parts,
        })
    };

    (contents, system_instruction)
}

fn build_gemini_request(request: &ChatRequest) -> GeminiRequest {
    let (contents, system_instruction) = convert_messages(&request.messages);
    GeminiRequest {
        contents,
        system_instruction,
        generation_config: Some(GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
            candidate_count: 1,
        }),
    }
}

fn extract_content(response: &GeminiResponse) -> Option<String> {
    response
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .first()
        .map(|part| part.text.clone())
}

fn convert_usage(metadata: &UsageMetadata) -> TokenUsage {
    TokenUsage {
        prompt_tokens: metadata.prompt_token_count.unwrap_or(0),
        completion_tokens: metadata.candidates_token_count.unwrap_or(0),
        total_tokens: metadata.total_token_count.unwrap_or(0),
    }
}

// ============================================================================
// Provider
// ============================================================================

impl GeminiProvider {
    /// Create a provider with an explicit API key and request timeout
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Config`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, PlannerError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|e| PlannerError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            client,
            default_model: DEFAULT_MODEL.to_owned(),
        })
    }

    /// Create a provider from the `GEMINI_API_KEY` environment variable
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Config`] if the variable is unset or empty.
    pub fn from_env() -> Result<Self, PlannerError> {
        let api_key = env::var(GEMINI_API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                PlannerError::config(format!("{GEMINI_API_KEY_ENV} environment variable not set"))
            })?;
        Self::new(api_key, DEFAULT_TIMEOUT)
    }

    /// Change the model used when requests do not name one
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    // The key rides on the URL; Gemini does not use an auth header
    fn build_url(&self, model: &str) -> String {
        format!(
            "{API_BASE_URL}/models/{model}:generateContent?key={}",
            self.api_key
        )
    }
}

// reqwest errors embed the request URL, which here carries the API key;
// strip it before the error reaches a log line or the source chain
fn transport_error(context: &str, e: reqwest::Error) -> PlannerError {
    let e = e.without_url();
    error!("{context}: {e}");
    PlannerError::transport(PROVIDER_NAME, e)
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn display_name(&self) -> &'static str {
        "Google Gemini"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn available_models(&self) -> &'static [&'static str] {
        AVAILABLE_MODELS
    }

    #[instrument(
        skip(self, request),
        fields(model = %request.model.as_deref().unwrap_or(&self.default_model))
    )]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, PlannerError> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());
        let gemini_request = build_gemini_request(request);
        debug!("Sending completion request to Gemini");

        let response = self
            .client
            .post(self.build_url(&model))
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| transport_error("Gemini request failed to complete", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error("Failed to read Gemini response body", e))?;

        if !status.is_success() {
            error!(status = status.as_u16(), "Gemini returned an error status");
            return Err(PlannerError::provider(
                PROVIDER_NAME,
                status.as_u16(),
                body,
            ));
        }

        let envelope: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(body = %body, "Could not decode Gemini response envelope: {e}");
            PlannerError::empty_response(PROVIDER_NAME)
        })?;

        // Gemini can report errors inside a 200 body
        if let Some(error) = envelope.error {
            warn!("Gemini reported an error in a success reply: {}", error.message);
            return Err(PlannerError::empty_response(PROVIDER_NAME));
        }

        let Some(content) = extract_content(&envelope) else {
            warn!("Gemini reply contained no candidates");
            return Err(PlannerError::empty_response(PROVIDER_NAME));
        };

        if content.trim().is_empty() {
            warn!("Gemini reply contained an empty candidate");
            return Err(PlannerError::empty_response(PROVIDER_NAME));
        }

        debug!("Received completion from Gemini");

        let finish_reason = envelope
            .candidates
            .as_ref()
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate.finish_reason.clone());

        Ok(ChatResponse {
            content,
            model,
            usage: envelope.usage_metadata.as_ref().map(convert_usage),
            finish_reason,
        })
    }
}
