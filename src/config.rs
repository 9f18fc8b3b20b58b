//! Configuration loading
//!
//! Settings come from an optional TOML file layered with `MATCHDAY_`-prefixed
//! environment variables; the provider credentials additionally fall back to
//! the `RAPIDAPI_KEY` / `RAPIDAPI_HOST` variables the upstream documents.

use crate::error::Result;
use serde::Deserialize;
use std::env;

const DEFAULT_API_HOST: &str = "api-football-v1.p.rapidapi.com";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Upstream football-data provider settings (RapidAPI-hosted).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: String,
    pub api_host: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_host: DEFAULT_API_HOST.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ProviderConfig {
    pub fn base_url(&self) -> String {
        format!("https://{}/v3", self.api_host)
    }

    /// Fill unset fields from the provider's own environment variables.
    pub fn apply_env_fallbacks(&mut self, api_key: Option<String>, api_host: Option<String>) {
        if self.api_key.is_empty() {
            if let Some(key) = api_key {
                self.api_key = key;
            }
        }
        if self.api_host == DEFAULT_API_HOST {
            if let Some(host) = api_host {
                self.api_host = host;
            }
        }
    }
}

impl Config {
    /// Load configuration from `path` (optional) plus the environment.
    pub fn load(path: &str) -> Result<Self> {
        let raw = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("MATCHDAY").separator("__"))
            .build()?;

        let mut cfg: Config = raw.try_deserialize()?;
        cfg.provider.apply_env_fallbacks(
            env::var("RAPIDAPI_KEY").ok(),
            env::var("RAPIDAPI_HOST").ok(),
        );
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.provider.api_key.is_empty() {
            return Err(config::ConfigError::Message(
                "provider.api_key is not set (configure it or export RAPIDAPI_KEY)".to_string(),
            )
            .into());
        }
        Ok(())
    }
}
