//! Runtime configuration read from the environment (and a `.env` file, if present).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::api_connection::endpoints::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SAVED_RECIPES_PATH: &str = "saved_recipes.json";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Name of the variable holding the OpenRouter key; the key itself is read per request.
    pub api_key_env_var: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    pub saved_recipes_path: PathBuf,
    pub site_url: String,
    pub app_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            saved_recipes_path: PathBuf::from(DEFAULT_SAVED_RECIPES_PATH),
            site_url: "http://localhost:3000".to_string(),
            app_name: "SaisonKueche".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `SAISON_AI_MODEL`: model name (default: "qwen/qwen3-32b")
    /// - `SAISON_AI_BASE_URL`: API base URL (default: "https://openrouter.ai/api/v1")
    /// - `SAISON_AI_TEMPERATURE`: sampling temperature (default: 0.7)
    /// - `SAISON_AI_MAX_TOKENS`: completion token cap (default: 2048)
    /// - `SAISON_AI_TIMEOUT_SECS`: HTTP timeout (default: 60)
    /// - `SAISON_SAVED_RECIPES_PATH`: favorites file (default: "saved_recipes.json")
    /// - `SITE_URL`, `APP_NAME`: OpenRouter attribution headers
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            api_key_env_var: defaults.api_key_env_var,
            model: lookup("SAISON_AI_MODEL").unwrap_or(defaults.model),
            base_url: lookup("SAISON_AI_BASE_URL").unwrap_or(defaults.base_url),
            temperature: parse_var(&lookup, "SAISON_AI_TEMPERATURE", defaults.temperature)?,
            max_tokens: parse_var(&lookup, "SAISON_AI_MAX_TOKENS", defaults.max_tokens)?,
            request_timeout_secs: parse_var(
                &lookup,
                "SAISON_AI_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            saved_recipes_path: lookup("SAISON_SAVED_RECIPES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.saved_recipes_path),
            site_url: lookup("SITE_URL").unwrap_or(defaults.site_url),
            app_name: lookup("APP_NAME").unwrap_or(defaults.app_name),
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
