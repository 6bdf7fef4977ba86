// ABOUTME: Provider-agnostic chat completion layer for meal generation
// ABOUTME: Defines the LlmProvider trait, chat types, and provider adapters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # LLM Provider Layer
//!
//! A thin chat-completion abstraction over the supported backends. The
//! pipeline builds a [`ChatRequest`], hands it to an [`LlmProvider`], and
//! gets back plain text in a [`ChatResponse`]. Everything provider-specific
//! (wire formats, auth, endpoints) stays inside the adapter modules:
//!
//! - [`GroqProvider`]: Groq cloud API (OpenAI-style wire format)
//! - [`GeminiProvider`]: Google Gemini API (`generateContent` wire format)
//! - [`OpenAiCompatibleProvider`]: any OpenAI-compatible endpoint such as
//!   Ollama, vLLM, or OpenRouter
//!
//! [`ChatProvider`] selects and wraps one of the adapters based on a
//! [`crate::config::PlannerConfig`].

mod gemini;
mod groq;
mod openai_compatible;
mod provider;

pub use gemini::{GeminiProvider, GEMINI_API_KEY_ENV};
pub use groq::{GroqProvider, GROQ_API_KEY_ENV};
pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
pub use provider::ChatProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::PlannerError;

// ============================================================================
// Chat Types
// ============================================================================

/// Role of a chat message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions that frame the whole conversation
    System,
    /// Content from the end user
    User,
    /// Content from the model
    Assistant,
}

impl MessageRole {
    /// Wire-format string for this role
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a message with an explicit role
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// A provider-agnostic completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far, in order
    pub messages: Vec<ChatMessage>,
    /// Model override; `None` uses the provider's default
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Completion token budget
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a request from a list of messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Override the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion token budget
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens produced in the completion
    pub completion_tokens: u32,
    /// Total tokens billed
    pub total_tokens: u32,
}

/// A provider-agnostic completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The completion text
    pub content: String,
    /// Model that actually served the request
    pub model: String,
    /// Token accounting, when the provider reports it
    pub usage: Option<TokenUsage>,
    /// Why generation stopped, when the provider reports it
    pub finish_reason: Option<String>,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// A chat completion backend
///
/// Implementations own their HTTP client and credentials. `complete` is the
/// only operation the pipeline needs; the rest is identification.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Stable machine-readable provider name (used in logs and errors)
    fn name(&self) -> &'static str;

    /// Human-readable provider name
    fn display_name(&self) -> &'static str;

    /// Model used when the request does not name one
    fn default_model(&self) -> &str;

    /// Models this provider is known to serve
    fn available_models(&self) -> &'static [&'static str];

    /// Execute a completion request
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Transport`] when the request never completes,
    /// [`PlannerError::Provider`] for non-success HTTP statuses, and
    /// [`PlannerError::EmptyResponse`] when a success reply carries no
    /// usable text.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, PlannerError>;
}
