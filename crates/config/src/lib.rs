//! Configuration management for indexpush
//!
//! This crate provides centralized configuration management with support for:
//! - The legacy `RSS_URL` / `INDEX_NOW_KEY` / `BING_KEY` / `BAIDU_KEY` / `BOT_TOKEN` /
//!   `CHAT_ID` environment variables and their `key[,count]` encoding
//! - An optional TOML or JSON file named by `INDEXPUSH_CONFIG`
//! - `INDEXPUSH_`-prefixed overrides for every field
//! - Validation of the merged result, once, at startup

mod config;
mod loader;
mod validation;

pub use crate::config::*;
pub use loader::*;
pub use validation::*;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Config validation failed: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config library error: {0}")]
    ConfigLibError(#[from] ::config::ConfigError),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
