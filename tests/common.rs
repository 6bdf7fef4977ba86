// ABOUTME: Shared test harness: logging setup and a scripted provider
// ABOUTME: ScriptedProvider replays canned replies without any network
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

#![allow(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;

use kondate::errors::PlannerError;
use kondate::llm::{ChatRequest, ChatResponse, LlmProvider};

static INIT_LOGGER: Once = Once::new();

/// Initialize tracing for tests. Set `TEST_LOG=1` to see output.
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        if std::env::var("TEST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_test_writer()
                .init();
        }
    });
}

/// One canned provider outcome
pub enum ScriptedReply {
    /// A successful completion with this text
    Content(String),
    /// An HTTP error status with this body
    ProviderStatus(u16, String),
    /// A network-level failure carrying this error
    Transport(reqwest::Error),
    /// A success reply with nothing usable in it
    Empty,
}

/// Produce a real `reqwest::Error` from a refused loopback connection
///
/// Port 1 has no listener, so the request fails at the network level
/// without leaving the machine.
pub async fn refused_connection_error() -> reqwest::Error {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
        .get("http://127.0.0.1:1/")
        .send()
        .await
        .unwrap_err()
}

/// A provider that replays canned replies in order
///
/// Popping past the end of the script behaves like an empty reply, so a
/// planner under test never hangs waiting for content.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ScriptedReply>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }

    pub fn with_reply(content: impl Into<String>) -> Self {
        Self::new(vec![ScriptedReply::Content(content.into())])
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted"
    }

    fn default_model(&self) -> &str {
        "test-model"
    }

    fn available_models(&self) -> &'static [&'static str] {
        &["test-model"]
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, PlannerError> {
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(ScriptedReply::Content(content)) => Ok(ChatResponse {
                content,
                model: "test-model".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            Some(ScriptedReply::ProviderStatus(status, body)) => {
                Err(PlannerError::provider("scripted", status, body))
            }
            Some(ScriptedReply::Transport(e)) => Err(PlannerError::transport("scripted", e)),
            Some(ScriptedReply::Empty) | None => Err(PlannerError::empty_response("scripted")),
        }
    }
}
