//! Core configuration structures

use indexpush_types::{ProviderConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Feed the candidate URLs come from
    pub feed: FeedConfig,

    /// Candidate store file
    pub store: StoreConfig,

    /// Per-provider credentials and caps
    pub providers: ProvidersConfig,

    /// Worker pool and deadlines
    pub dispatch: DispatchConfig,

    /// Report delivery
    pub notifier: NotifierConfig,

    /// Logging
    pub telemetry: TelemetryConfig,
}

/// Feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Atom feed URL; its host identifies the site
    #[serde(default)]
    pub rss_url: String,

    /// HEAD liveness check timeout in milliseconds
    #[serde(default = "default_precheck_timeout_ms")]
    pub precheck_timeout_ms: u64,

    /// Feed download timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl FeedConfig {
    pub fn precheck_timeout(&self) -> Duration {
        Duration::from_millis(self.precheck_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Candidate store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Plain text file, one URL per line
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

/// Provider credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub index_now: ProviderConfig,

    #[serde(default)]
    pub bing: ProviderConfig,

    #[serde(default)]
    pub baidu: ProviderConfig,

    #[serde(default)]
    pub google: GoogleConfig,
}

impl ProvidersConfig {
    /// Credential-based config for a provider. Google has none and reports disabled.
    pub fn get(&self, kind: ProviderKind) -> ProviderConfig {
        match kind {
            ProviderKind::IndexNow => self.index_now.clone(),
            ProviderKind::Bing => self.bing.clone(),
            ProviderKind::Baidu => self.baidu.clone(),
            ProviderKind::Google => ProviderConfig::disabled(),
        }
    }
}

/// Google Indexing API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Service account key file; submission is skipped when it is missing
    #[serde(default = "default_service_account_path")]
    pub service_account_path: PathBuf,
}

/// Dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum provider submissions in flight
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Deadline for a single provider submission in milliseconds
    #[serde(default = "default_task_timeout_ms")]
    pub task_timeout_ms: u64,

    /// Deadline for the whole dispatch in milliseconds
    #[serde(default = "default_run_timeout_ms")]
    pub run_timeout_ms: u64,
}

impl DispatchConfig {
    pub fn task_timeout(&self) -> Duration {
        Duration::from_millis(self.task_timeout_ms)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_millis(self.run_timeout_ms)
    }
}

/// Telegram bot configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub bot_token: String,

    #[serde(default)]
    pub chat_id: String,
}

impl NotifierConfig {
    pub fn is_enabled(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub default_filter: String,
}

// Default value functions
fn default_precheck_timeout_ms() -> u64 {
    10_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_store_path() -> PathBuf {
    PathBuf::from("urls.txt")
}

fn default_service_account_path() -> PathBuf {
    PathBuf::from("google_service.json")
}

fn default_max_workers() -> usize {
    5
}

fn default_task_timeout_ms() -> u64 {
    30_000
}

fn default_run_timeout_ms() -> u64 {
    120_000 // 2 minutes
}

fn default_log_filter() -> String {
    "info,indexpush=debug".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            rss_url: String::new(),
            precheck_timeout_ms: default_precheck_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            service_account_path: default_service_account_path(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            task_timeout_ms: default_task_timeout_ms(),
            run_timeout_ms: default_run_timeout_ms(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            default_filter: default_log_filter(),
        }
    }
}
