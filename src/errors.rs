// ABOUTME: Error taxonomy for the meal plan generation pipeline
// ABOUTME: Separates config, transport, provider, empty-response, and parse failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # Error Types
//!
//! Every failure the pipeline can hit maps to exactly one [`PlannerError`]
//! variant. The distinction matters because the pipeline treats them
//! differently: `Config` is surfaced to the caller before any network I/O,
//! while every other variant is absorbed into the deterministic fallback so
//! [`crate::MealPlanner::generate`] never fails.

/// Errors produced while configuring or running the generation pipeline
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Missing or invalid configuration, detected before any network I/O
    #[error("Configuration error: {message}")]
    Config {
        /// What is missing or invalid
        message: String,
    },

    /// The HTTP request could not complete at the network level
    #[error("Transport failure calling {provider}")]
    Transport {
        /// Provider that was being called
        provider: &'static str,
        /// Underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// The provider endpoint answered with a non-success HTTP status
    #[error("{provider} returned HTTP {status}")]
    Provider {
        /// Provider that answered
        provider: &'static str,
        /// HTTP status code
        status: u16,
        /// Raw response body, preserved for diagnostics
        body: String,
    },

    /// The provider answered 2xx but no usable completion text was present
    #[error("{provider} returned an empty completion")]
    EmptyResponse {
        /// Provider that answered
        provider: &'static str,
    },

    /// The reply text could not be decoded into the expected meal schema
    #[error("Could not extract a meal plan from the model reply")]
    Parse {
        /// The raw reply text, kept for logging
        raw: String,
    },
}

impl PlannerError {
    /// Configuration error with a descriptive message
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Network-level failure while calling a provider
    #[must_use]
    pub const fn transport(provider: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { provider, source }
    }

    /// Non-2xx answer from a provider, with the raw body preserved
    #[must_use]
    pub fn provider(provider: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self::Provider {
            provider,
            status,
            body: body.into(),
        }
    }

    /// Successful HTTP exchange that carried no usable completion
    #[must_use]
    pub const fn empty_response(provider: &'static str) -> Self {
        Self::EmptyResponse { provider }
    }

    /// Undecodable reply text, with the original kept for logging
    #[must_use]
    pub fn parse(raw: impl Into<String>) -> Self {
        Self::Parse { raw: raw.into() }
    }

    /// True for the one non-retryable variant the pipeline surfaces to callers
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = PlannerError::config("GROQ_API_KEY is not set");
        assert_eq!(
            error.to_string(),
            "Configuration error: GROQ_API_KEY is not set"
        );
        assert!(error.is_config());
    }

    #[test]
    fn test_provider_error_keeps_body() {
        let error = PlannerError::provider("groq", 429, r#"{"error":{"message":"rate limited"}}"#);
        assert_eq!(error.to_string(), "groq returned HTTP 429");
        match error {
            PlannerError::Provider { status, body, .. } => {
                assert_eq!(status, 429);
                assert!(body.contains("rate limited"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_keeps_raw_text() {
        let error = PlannerError::parse("not json at all");
        assert!(!error.is_config());
        match error {
            PlannerError::Parse { raw } => assert_eq!(raw, "not json at all"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
