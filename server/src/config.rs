use std::{env, path::PathBuf};

use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid PORT value: {0}")]
    InvalidPort(String),

    #[error("invalid API_PROXY_TARGET url: {0}")]
    InvalidTarget(#[from] url::ParseError),
}

/// Process-wide settings, read once at startup and never reloaded.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_target: Url,
    pub is_production: bool,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = load_or("PORT", "3000");
        let port = port
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;

        let api_target = Url::parse(&load_or("API_PROXY_TARGET", "http://localhost:8000"))?;

        let is_production = env::var("NODE_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let static_dir = PathBuf::from(load_or("STATIC_DIR", "dist"));

        Ok(Self {
            port,
            api_target,
            is_production,
            static_dir,
        })
    }
}

fn load_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}
