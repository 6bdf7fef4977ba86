// ABOUTME: Groq provider adapter speaking the OpenAI-style chat completions format
// ABOUTME: Maps generic chat requests onto the Groq cloud API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # Groq Provider
//!
//! Adapter for the Groq cloud API. Groq serves open-weight models behind an
//! OpenAI-style `chat/completions` endpoint with bearer authentication.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::errors::PlannerError;

/// Environment variable for the Groq API key
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Default model for meal generation
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Models available on Groq
pub const AVAILABLE_MODELS: &[&str] = &[
    "llama-3.3-70b-versatile",
    "llama-3.1-8b-instant",
    "qwen/qwen3-32b",
    "openai/gpt-oss-120b",
];

/// Groq API base URL
const API_BASE_URL: &str = "https://api.groq.com/openai/v1";

const PROVIDER_NAME: &str = "groq";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Groq chat completion provider
pub struct GroqProvider {
    client: Client,
    api_key: String,
}

// ============================================================================
// Wire Format
// ============================================================================

#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<GroqMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: Option<bool>,
}

#[derive(Debug, Serialize)]
struct GroqMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for GroqMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.as_str().to_owned(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
    #[serde(default)]
    usage: Option<GroqUsage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

// ============================================================================
// Provider
// ============================================================================

impl GroqProvider {
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
            client,
            api_key: api_key.into(),
        })
    }

    /// Create a provider from the `GROQ_API_KEY` environment variable
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Config`] if the variable is unset or empty.
    pub fn from_env() -> Result<Self, PlannerError> {
        let api_key = env::var(GROQ_API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                PlannerError::config(format!("{GROQ_API_KEY_ENV} environment variable not set"))
            })?;
        Self::new(api_key, DEFAULT_TIMEOUT)
    }

    fn build_request(request: &ChatRequest) -> GroqRequest {
        GroqRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            messages: request.messages.iter().map(GroqMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: Some(false),
        }
    }
}

fn api_url(endpoint: &str) -> String {
    format!("{API_BASE_URL}/{endpoint}")
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn display_name(&self) -> &'static str {
        "Groq"
    }

    fn default_model(&self) -> &str {
        DEFAULT_MODEL
    }

    fn available_models(&self) -> &'static [&'static str] {
        AVAILABLE_MODELS
    }

    #[instrument(
        skip(self, request),
        fields(model = %request.model.as_deref().unwrap_or(DEFAULT_MODEL))
    )]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, PlannerError> {
        let groq_request = Self::build_request(request);
        debug!("Sending completion request to Groq");

        let response = self
            .client
            .post(api_url("chat/completions"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&groq_request)
            .send()
            .await
            .map_err(|e| {
                error!("Groq request failed to complete: {e}");
                PlannerError::transport(PROVIDER_NAME, e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read Groq response body: {e}");
            PlannerError::transport(PROVIDER_NAME, e)
        })?;

        if !status.is_success() {
            error!(status = status.as_u16(), "Groq returned an error status");
            return Err(PlannerError::provider(
                PROVIDER_NAME,
                status.as_u16(),
                body,
            ));
        }

        let envelope: GroqResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(body = %body, "Could not decode Groq response envelope: {e}");
            PlannerError::empty_response(PROVIDER_NAME)
        })?;

        let Some(choice) = envelope.choices.into_iter().next() else {
            warn!("Groq reply contained no choices");
            return Err(PlannerError::empty_response(PROVIDER_NAME));
        };

        if choice.message.content.trim().is_empty() {
            warn!("Groq reply contained an empty message");
            return Err(PlannerError::empty_response(PROVIDER_NAME));
        }

        debug!(model = %envelope.model, "Received completion from Groq");

        Ok(ChatResponse {
            content: choice.message.content,
            model: envelope.model,
            usage: envelope.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}
