//! Boundary to the hosted text-generation service.
//!
//! The pipeline only needs "send a system and a user message, get text back", so the
//! transport sits behind [`ModelInvoker`]. [`OpenRouterInvoker`] is the production
//! implementation; [`FakeInvoker`] returns canned output for tests and offline runs.

use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::api_connection::endpoints::{ChatCompletionRequest, ChatMessage, Provider, ResponseFormat};
use crate::api_connection::ApiConnectionError;
use crate::config::AppConfig;

#[async_trait]
pub trait ModelInvoker: Send + Sync + fmt::Debug {
    /// Sends one request. `Ok(None)` means the call succeeded but carried no text.
    async fn invoke(
        &self,
        system_message: &str,
        user_message: &str,
    ) -> Result<Option<String>, ApiConnectionError>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct OpenRouterInvoker {
    provider: Provider,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenRouterInvoker {
    pub fn new(provider: Provider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiConnectionError> {
        let provider = Provider::from_config(config)?;
        Ok(Self {
            provider,
            model: config.model.clone(),
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
        })
    }
}

#[async_trait]
impl ModelInvoker for OpenRouterInvoker {
    async fn invoke(
        &self,
        system_message: &str,
        user_message: &str,
    ) -> Result<Option<String>, ApiConnectionError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(system_message),
                ChatMessage::user(user_message),
            ],
            response_format: Some(ResponseFormat::json_object()),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self.provider.call_chat_completion(request).await?;
        if let Some(usage) = &response.usage {
            tracing::debug!(
                provider = self.provider.name(),
                prompt_tokens = usage.prompt_tokens,
                total_tokens = usage.total_tokens,
                "Chat completion finished"
            );
        }
        Ok(response.first_content().map(str::to_string))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Clone)]
enum FakeReply {
    Text(String),
    NoContent,
    Failure(reqwest::StatusCode, String),
}

/// Deterministic stand-in for the hosted model.
#[derive(Debug)]
pub struct FakeInvoker {
    reply: FakeReply,
    calls: AtomicUsize,
    last_user_message: Mutex<Option<String>>,
}

impl FakeInvoker {
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::from_reply(FakeReply::Text(response.into()))
    }

    pub fn without_content() -> Self {
        Self::from_reply(FakeReply::NoContent)
    }

    /// Fails every call the way a provider-side rejection would.
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        let status = reqwest::StatusCode::from_u16(status)
            .unwrap_or(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        Self::from_reply(FakeReply::Failure(status, body.into()))
    }

    fn from_reply(reply: FakeReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_user_message: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_user_message(&self) -> Option<String> {
        self.last_user_message
            .lock()
            .ok()
            .and_then(|message| message.clone())
    }
}

#[async_trait]
impl ModelInvoker for FakeInvoker {
    async fn invoke(
        &self,
        _system_message: &str,
        user_message: &str,
    ) -> Result<Option<String>, ApiConnectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_user_message.lock() {
            *last = Some(user_message.to_string());
        }

        match &self.reply {
            FakeReply::Text(text) => Ok(Some(text.clone())),
            FakeReply::NoContent => Ok(None),
            FakeReply::Failure(status, body) => Err(ApiConnectionError::ApiError {
                status: *status,
                error_body: body.clone(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
