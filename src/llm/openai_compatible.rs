// ABOUTME: Adapter for any OpenAI-compatible chat completions endpoint
// ABOUTME: Covers self-hosted Ollama and vLLM as well as hosted OpenRouter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # OpenAI-Compatible Provider
//!
//! One adapter for every endpoint that speaks the OpenAI chat completions
//! wire format. The endpoint is described by an [`OpenAiCompatibleConfig`]
//! rather than baked-in constants, so the same code serves a local Ollama
//! instance, a vLLM deployment, or a hosted aggregator like OpenRouter.
//! Authentication is optional; local endpoints usually run keyless.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::errors::PlannerError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// Self-hosted endpoints serve whatever models are pulled locally, so there
// is no meaningful static list to advertise.
const AVAILABLE_MODELS: &[&str] = &[];

/// Endpoint description for an OpenAI-compatible provider
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL up to and including the version segment (e.g. `.../v1`)
    pub base_url: String,
    /// Bearer token; `None` for keyless local endpoints
    pub api_key: Option<String>,
    /// Model used when requests do not name one
    pub default_model: String,
    /// Machine-readable name used in logs
    pub provider_name: String,
    /// Human-readable name
    pub display_name: String,
}

impl OpenAiCompatibleConfig {
    /// Config for a local Ollama instance on its default port
    #[must_use]
    pub fn ollama() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_owned(),
            api_key: None,
            default_model: "qwen2.5:14b-instruct".to_owned(),
            provider_name: "ollama".to_owned(),
            display_name: "Ollama".to_owned(),
        }
    }

    /// Config for a local vLLM deployment on its default port
    #[must_use]
    pub fn vllm() -> Self {
        Self {
            base_url: "http://localhost:8000/v1".to_owned(),
            api_key: None,
            default_model: "Qwen/Qwen2.5-14B-Instruct".to_owned(),
            provider_name: "vllm".to_owned(),
            display_name: "vLLM".to_owned(),
        }
    }

    /// Config for the hosted OpenRouter aggregator
    #[must_use]
    pub fn openrouter(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_owned(),
            api_key: Some(api_key.into()),
            default_model: "meta-llama/llama-3.3-70b-instruct".to_owned(),
            provider_name: "openrouter".to_owned(),
            display_name: "OpenRouter".to_owned(),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the bearer token
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the default model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self::ollama()
    }
}

// Custom Debug that never prints credentials
impl fmt::Debug for OpenAiCompatibleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatibleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("default_model", &self.default_model)
            .field("provider_name", &self.provider_name)
            .field("display_name", &self.display_name)
            .finish()
    }
}

// ============================================================================
// Wire Format
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<CompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: Option<bool>,
}

#[derive(Debug, Serialize)]
struct CompletionMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for CompletionMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.as_str().to_owned(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

// ============================================================================
// Provider
// ============================================================================

/// Chat completion provider for OpenAI-compatible endpoints
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a provider for the described endpoint with a request timeout
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Config`] if the HTTP client cannot be built.
    pub fn new(
        config: OpenAiCompatibleConfig,
        timeout: Duration,
    ) -> Result<Self, PlannerError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|e| PlannerError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) if !key.is_empty() => {
                request.header("Authorization", format!("Bearer {key}"))
            }
            _ => request,
        }
    }

    fn build_request(&self, request: &ChatRequest) -> CompletionRequest {
        CompletionRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.config.default_model.clone()),
            messages: request
                .messages
                .iter()
                .map(CompletionMessage::from)
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: Some(false),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    // The trait hands out 'static names, so dynamic provider names are
    // mapped onto the known set and anything else becomes "local".
    fn name(&self) -> &'static str {
        match self.config.provider_name.as_str() {
            "ollama" => "ollama",
            "vllm" => "vllm",
            "openrouter" => "openrouter",
            _ => "local",
        }
    }

    fn display_name(&self) -> &'static str {
        match self.config.provider_name.as_str() {
            "ollama" => "Ollama",
            "vllm" => "vLLM",
            "openrouter" => "OpenRouter",
            _ => "Local LLM",
        }
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    fn available_models(&self) -> &'static [&'static str] {
        AVAILABLE_MODELS
    }

    #[instrument(
        skip(self, request),
        fields(
            provider = %self.config.provider_name,
            model = %request.model.as_deref().unwrap_or(&self.config.default_model)
        )
    )]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, PlannerError> {
        let completion_request = self.build_request(request);
        let provider = self.name();
        debug!("Sending completion request to OpenAI-compatible endpoint");

        let response = self
            .add_auth_header(self.client.post(self.api_url("chat/completions")))
            .header("Content-Type", "application/json")
            .json(&completion_request)
            .send()
            .await
            .map_err(|e| {
                error!("Request to {} failed to complete: {e}", self.config.base_url);
                PlannerError::transport(provider, e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read response body from {}: {e}", self.config.base_url);
            PlannerError::transport(provider, e)
        })?;

        if !status.is_success() {
            error!(status = status.as_u16(), "Endpoint returned an error status");
            return Err(PlannerError::provider(provider, status.as_u16(), body));
        }

        let envelope: CompletionResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(body = %body, "Could not decode response envelope: {e}");
            PlannerError::empty_response(provider)
        })?;

        let model = envelope.model.unwrap_or(completion_request.model);

        let Some(choice) = envelope.choices.into_iter().next() else {
            warn!("Reply contained no choices");
            return Err(PlannerError::empty_response(provider));
        };

        if choice.message.content.trim().is_empty() {
            warn!("Reply contained an empty message");
            return Err(PlannerError::empty_response(provider));
        }

        debug!(model = %model, "Received completion");

        Ok(ChatResponse {
            content: choice.message.content,
            model,
            usage: envelope.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}
