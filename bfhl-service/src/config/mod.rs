use crate::services::providers::gemini::GEMINI_API_BASE;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, Deserialize)]
pub struct BfhlConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    /// Identifying address echoed in every success envelope.
    pub official_email: String,
    pub gemini: GeminiSettings,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    /// Without a key the service answers `AI` requests from the mock provider.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl BfhlConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(BfhlConfig {
            common: common_config,
            official_email: get_env("OFFICIAL_EMAIL", None, false)?,
            gemini: GeminiSettings {
                api_key: if is_prod {
                    Some(get_env("GEMINI_API_KEY", None, is_prod)?)
                } else {
                    get_optional_env("GEMINI_API_KEY")
                },
                model: get_env("GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL), false)?,
                base_url: get_env("GEMINI_API_BASE", Some(GEMINI_API_BASE), false)?,
            },
            observability: ObservabilityConfig {
                log_level: get_env("LOG_LEVEL", Some("info"), false)?,
                otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            },
        })
    }
}

fn get_optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.trim().is_empty())
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match get_optional_env(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
