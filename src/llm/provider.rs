// ABOUTME: Provider selection: turns a PlannerConfig into a concrete adapter
// ABOUTME: ChatProvider wraps the adapters behind one LlmProvider value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # Provider Selection
//!
//! [`ChatProvider`] is the one concrete [`LlmProvider`] the pipeline holds.
//! Construction is where credentials are validated: a config naming a cloud
//! provider without a key fails here with [`PlannerError::Config`], before
//! any request is attempted. OpenAI-compatible endpoints are exempt since
//! local deployments usually run keyless.

use std::fmt;

use async_trait::async_trait;

use super::gemini::{GeminiProvider, GEMINI_API_KEY_ENV};
use super::groq::{GroqProvider, GROQ_API_KEY_ENV};
use super::openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use super::{ChatRequest, ChatResponse, LlmProvider};
use crate::config::{PlannerConfig, ProviderKind, API_KEY_ENV_VAR};
use crate::errors::PlannerError;

/// A configured completion provider, one of the supported backends
pub enum ChatProvider {
    /// Groq cloud API
    Groq(GroqProvider),
    /// Google Gemini API
    Gemini(GeminiProvider),
    /// OpenAI-compatible endpoint
    OpenAiCompatible(OpenAiCompatibleProvider),
}

impl ChatProvider {
    /// Construct the provider a config describes
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Config`] when a cloud provider is selected
    /// without an API key, or when the HTTP client cannot be built.
    pub fn from_config(config: &PlannerConfig) -> Result<Self, PlannerError> {
        match config.provider {
            ProviderKind::Groq => {
                let api_key = require_key(config, GROQ_API_KEY_ENV)?;
                Ok(Self::Groq(GroqProvider::new(
                    api_key,
                    config.request_timeout,
                )?))
            }
            ProviderKind::Gemini => {
                let api_key = require_key(config, GEMINI_API_KEY_ENV)?;
                let mut provider = GeminiProvider::new(api_key, config.request_timeout)?;
                if let Some(model) = &config.model {
                    provider = provider.with_default_model(model);
                }
                Ok(Self::Gemini(provider))
            }
            ProviderKind::OpenAiCompatible => {
                let mut compat = OpenAiCompatibleConfig::default();
                if let Some(base_url) = &config.base_url {
                    compat = compat.with_base_url(base_url);
                }
                if let Some(api_key) = &config.api_key {
                    compat = compat.with_api_key(api_key);
                }
                if let Some(model) = &config.model {
                    compat = compat.with_default_model(model);
                }
                Ok(Self::OpenAiCompatible(OpenAiCompatibleProvider::new(
                    compat,
                    config.request_timeout,
                )?))
            }
        }
    }

    /// Construct the provider described by the `KONDATE_LLM_*` environment
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ChatProvider::from_config`].
    pub fn from_env() -> Result<Self, PlannerError> {
        Self::from_config(&PlannerConfig::from_env())
    }
}

fn require_key(config: &PlannerConfig, env_var: &str) -> Result<String, PlannerError> {
    config.api_key.clone().ok_or_else(|| {
        PlannerError::config(format!(
            "No API key configured for {}; set {env_var} (or {API_KEY_ENV_VAR}), \
             or supply one with with_api_key",
            config.provider
        ))
    })
}

#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        match self {
            Self::Groq(p) => p.name(),
            Self::Gemini(p) => p.name(),
            Self::OpenAiCompatible(p) => p.name(),
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::Groq(p) => p.display_name(),
            Self::Gemini(p) => p.display_name(),
            Self::OpenAiCompatible(p) => p.display_name(),
        }
    }

    fn default_model(&self) -> &str {
        match self {
            Self::Groq(p) => p.default_model(),
            Self::Gemini(p) => p.default_model(),
            Self::OpenAiCompatible(p) => p.default_model(),
        }
    }

    fn available_models(&self) -> &'static [&'static str] {
        match self {
            Self::Groq(p) => p.available_models(),
            Self::Gemini(p) => p.available_models(),
            Self::OpenAiCompatible(p) => p.available_models(),
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, PlannerError> {
        match self {
            Self::Groq(p) => p.complete(request).await,
            Self::Gemini(p) => p.complete(request).await,
            Self::OpenAiCompatible(p) => p.complete(request).await,
        }
    }
}

// Adapters hold credentials, so the derived Debug is off the table
impl fmt::Debug for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Groq(_) => write!(f, "ChatProvider::Groq"),
            Self::Gemini(_) => write!(f, "ChatProvider::Gemini"),
            Self::OpenAiCompatible(_) => write!(f, "ChatProvider::OpenAiCompatible"),
        }
    }
}
