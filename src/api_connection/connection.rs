use reqwest::Client;
use std::env;
use std::time::Duration;
use thiserror::Error;

use super::endpoints::{ChatCompletionRequest, ChatCompletionResponse, Provider, DEFAULT_BASE_URL};
use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
}

impl Provider {
    pub fn openrouter(api_key_env_var_name: &str) -> Self {
        Self::OpenRouter {
            api_key: api_key_env_var_name.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
            site_url: env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "SaisonKueche".to_string()),
        }
    }

    /// Builds the provider with the configured endpoint and transport timeout.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiConnectionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self::OpenRouter {
            api_key: config.api_key_env_var.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            site_url: config.site_url.clone(),
            app_name: config.app_name.clone(),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenRouter { .. } => "openrouter",
        }
    }

    pub async fn call_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        match self {
            Provider::OpenRouter {
                api_key: api_key_env_var_name,
                base_url,
                client,
                site_url,
                app_name,
            } => {
                let actual_api_key = env::var(api_key_env_var_name)
                    .map_err(|_| ApiConnectionError::MissingApiKey(api_key_env_var_name.clone()))?;

                let url = format!("{}/chat/completions", base_url);
                tracing::debug!(url = %url, model = %request.model, "Sending chat completion request");

                let response = client
                    .post(&url)
                    .bearer_auth(actual_api_key)
                    .header("Content-Type", "application/json")
                    .header("HTTP-Referer", site_url)
                    .header("X-Title", app_name)
                    .json(&request)
                    .send()
                    .await?;

                if response.status().is_success() {
                    let body = response.text().await?;
                    let chat_response = serde_json::from_str::<ChatCompletionResponse>(&body)?;
                    Ok(chat_response)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    Err(ApiConnectionError::ApiError { status, error_body })
                }
            }
        }
    }
}
