// ABOUTME: Planner configuration: provider selection, credentials, and tuning knobs
// ABOUTME: Resolves settings from the environment with sensible defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # Planner Configuration
//!
//! [`PlannerConfig`] gathers everything the pipeline needs before it makes
//! its first request: which provider to talk to, the credential for it, and
//! the sampling parameters. Build one explicitly with the builder methods or
//! let [`PlannerConfig::from_env`] read the `KONDATE_LLM_*` variables.
//!
//! Missing credentials are not an error here. Validation happens when the
//! provider is constructed, so a config can be assembled and inspected
//! without any keys present.

use std::env;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::llm::{GEMINI_API_KEY_ENV, GROQ_API_KEY_ENV};

/// Environment variable selecting the completion provider
pub const PROVIDER_ENV_VAR: &str = "KONDATE_LLM_PROVIDER";

/// Environment variable holding the API key, regardless of provider
///
/// Takes precedence over the provider-specific variables
/// (`GROQ_API_KEY`, `GEMINI_API_KEY`).
pub const API_KEY_ENV_VAR: &str = "KONDATE_LLM_API_KEY";

/// Environment variable overriding the provider's default model
pub const MODEL_ENV_VAR: &str = "KONDATE_LLM_MODEL";

/// Environment variable overriding the API base URL (self-hosted providers)
pub const BASE_URL_ENV_VAR: &str = "KONDATE_LLM_BASE_URL";

/// Default sampling temperature for meal generation
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion token budget
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Default end-to-end timeout for a single completion request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Which completion backend the pipeline talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Groq cloud API (default)
    #[default]
    Groq,
    /// Google Gemini API
    Gemini,
    /// Any OpenAI-compatible endpoint (Ollama, vLLM, OpenRouter, ...)
    OpenAiCompatible,
}

impl ProviderKind {
    /// Parse from string with fallback to the default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Self::Gemini,
            "openai" | "openai_compatible" | "openai-compatible" | "local" | "ollama"
            | "vllm" | "openrouter" => Self::OpenAiCompatible,
            _ => Self::Groq, // Default fallback (including "groq")
        }
    }

    /// Read the provider selection from the environment
    #[must_use]
    pub fn from_env() -> Self {
        env::var(PROVIDER_ENV_VAR)
            .map(|v| Self::from_str_or_default(&v))
            .unwrap_or_default()
    }

    /// Lowercase identifier used in logs and serialization
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Gemini => "gemini",
            Self::OpenAiCompatible => "openai_compatible",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the pipeline needs to construct a provider and shape requests
#[derive(Clone)]
pub struct PlannerConfig {
    /// Which backend to call
    pub provider: ProviderKind,
    /// API key for the backend; `None` for keyless local endpoints
    pub api_key: Option<String>,
    /// Model override; `None` uses the provider's default
    pub model: Option<String>,
    /// Base URL override for OpenAI-compatible endpoints
    pub base_url: Option<String>,
    /// Sampling temperature passed to the provider
    pub temperature: f32,
    /// Completion token budget passed to the provider
    pub max_tokens: u32,
    /// End-to-end timeout for a single completion request
    pub request_timeout: Duration,
}

impl PlannerConfig {
    /// Config for the given provider with all other fields at their defaults
    #[must_use]
    pub const fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            api_key: None,
            model: None,
            base_url: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Build a config from the `KONDATE_LLM_*` environment variables
    ///
    /// The generic key variable wins over the provider-specific one, and
    /// empty values are treated as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let provider = ProviderKind::from_env();
        let api_key = env_value(API_KEY_ENV_VAR).or_else(|| match provider {
            ProviderKind::Groq => env_value(GROQ_API_KEY_ENV),
            ProviderKind::Gemini => env_value(GEMINI_API_KEY_ENV),
            ProviderKind::OpenAiCompatible => None,
        });

        Self {
            provider,
            api_key,
            model: env_value(MODEL_ENV_VAR),
            base_url: env_value(BASE_URL_ENV_VAR),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the provider's default model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override the API base URL (OpenAI-compatible endpoints only)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the completion token budget
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the end-to-end request timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new(ProviderKind::default())
    }
}

// Custom Debug that never prints credentials
impl fmt::Debug for PlannerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
