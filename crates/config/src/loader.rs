//! Configuration loading from multiple sources

use crate::{AppConfig, ConfigError, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use indexpush_types::ProviderConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Names a TOML or JSON file layered under the environment
pub const CONFIG_PATH_VAR: &str = "INDEXPUSH_CONFIG";

/// Prefix for structured overrides, e.g. `INDEXPUSH_DISPATCH__TASK_TIMEOUT_MS`
pub const ENV_PREFIX: &str = "INDEXPUSH";

pub const RSS_URL_VAR: &str = "RSS_URL";
pub const INDEX_NOW_KEY_VAR: &str = "INDEX_NOW_KEY";
pub const BING_KEY_VAR: &str = "BING_KEY";
pub const BAIDU_KEY_VAR: &str = "BAIDU_KEY";
pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";
pub const CHAT_ID_VAR: &str = "CHAT_ID";
pub const GOOGLE_SERVICE_JSON_VAR: &str = "GOOGLE_SERVICE_JSON";

/// Configuration loader with support for multiple formats and sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    ///
    /// Supports TOML and JSON formats based on file extension
    pub fn from_file(path: &Path) -> Result<AppConfig> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let content = std::fs::read_to_string(path)?;

        match extension {
            "toml" => Self::from_toml(&content),
            "json" => Self::from_json(&content),
            _ => Err(ConfigError::LoadError(format!(
                "Unsupported file extension: {}",
                extension
            ))),
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<AppConfig> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration from JSON string
    pub fn from_json(content: &str) -> Result<AppConfig> {
        serde_json::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration the way the binary does
    ///
    /// 1. Defaults
    /// 2. The file named by `INDEXPUSH_CONFIG`, if set
    /// 3. `INDEXPUSH_`-prefixed variables
    /// 4. The legacy `RSS_URL`, `*_KEY`, `BOT_TOKEN`, `CHAT_ID` variables
    pub fn from_env() -> Result<AppConfig> {
        let mut builder = Self::builder();
        if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
            debug!(path = %path, "Layering config file");
            builder = builder.add_file(Path::new(&path), true);
        }

        let mut config = builder.add_env(ENV_PREFIX).build()?;
        Self::apply_env(&mut config, |name| std::env::var(name).ok());
        Ok(config)
    }

    /// Overlay the legacy variables onto `config`
    ///
    /// A variable that is present always wins, so setting `BING_KEY=""`
    /// disables Bing even if a file enabled it. Absent variables leave the
    /// value from lower layers untouched.
    pub fn apply_env<F>(config: &mut AppConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rss_url) = lookup(RSS_URL_VAR) {
            config.feed.rss_url = rss_url.trim().to_string();
        }
        if let Some(raw) = lookup(INDEX_NOW_KEY_VAR) {
            config.providers.index_now = parse_credential(&raw);
        }
        if let Some(raw) = lookup(BING_KEY_VAR) {
            config.providers.bing = parse_credential(&raw);
        }
        if let Some(raw) = lookup(BAIDU_KEY_VAR) {
            config.providers.baidu = parse_credential(&raw);
        }
        if let Some(token) = lookup(BOT_TOKEN_VAR) {
            config.notifier.bot_token = token;
        }
        if let Some(chat_id) = lookup(CHAT_ID_VAR) {
            config.notifier.chat_id = chat_id;
        }
        if let Some(path) = lookup(GOOGLE_SERVICE_JSON_VAR).filter(|p| !p.is_empty()) {
            config.providers.google.service_account_path = PathBuf::from(path);
        }
    }

    /// Build configuration using the config crate's builder pattern
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder {
            builder: Config::builder(),
        }
    }
}

/// Parse the legacy `credential[,count]` encoding.
///
/// The count is honoured only when there are exactly two segments and the
/// second is a plain non-negative integer; anything else is ignored.
pub fn parse_credential(raw: &str) -> ProviderConfig {
    let mut segments: Vec<&str> = raw.split(',').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }

    let credential = segments.first().copied().unwrap_or_default();
    let limit = match segments.as_slice() {
        [_, count] if !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit()) => {
            count.parse::<usize>().ok()
        }
        _ => None,
    };

    ProviderConfig::new(credential, limit)
}

/// Builder for complex configuration loading scenarios
pub struct ConfigLoaderBuilder {
    builder: ConfigBuilder<config::builder::DefaultState>,
}

impl ConfigLoaderBuilder {
    /// Add a configuration file source
    pub fn add_file(mut self, path: &Path, required: bool) -> Self {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => FileFormat::Json,
            _ => FileFormat::Toml,
        };

        self.builder = self
            .builder
            .add_source(File::from(path).format(format).required(required));
        self
    }

    /// Add environment variable source with prefix
    pub fn add_env(mut self, prefix: &str) -> Self {
        self.builder = self.builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        self
    }

    /// Set a default value for a key
    pub fn set_default(mut self, key: &str, value: &str) -> Result<Self> {
        self.builder = self.builder.set_default(key, value)?;
        Ok(self)
    }

    /// Build the final configuration
    pub fn build(self) -> Result<AppConfig> {
        let config = self.builder.build()?;
        config.try_deserialize().map_err(ConfigError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_parse_credential_key_only() {
        let parsed = parse_credential("abc123");
        assert_eq!(parsed.credential(), "abc123");
        assert_eq!(parsed.limit, None);
    }

    #[test]
    fn test_parse_credential_with_count() {
        let parsed = parse_credential("abc123,25");
        assert_eq!(parsed.credential(), "abc123");
        assert_eq!(parsed.limit, Some(25));
    }

    #[test]
    fn test_parse_credential_ignores_bad_count() {
        assert_eq!(parse_credential("abc,ten").limit, None);
        assert_eq!(parse_credential("abc,-3").limit, None);
        assert_eq!(parse_credential("abc,1,2").limit, None);
        assert_eq!(parse_credential("abc,99999999999999999999999").limit, None);
        assert_eq!(parse_credential("abc,1,2").credential(), "abc");
    }

    #[test]
    fn test_parse_credential_trailing_comma() {
        let parsed = parse_credential("abc,");
        assert_eq!(parsed.credential(), "abc");
        assert_eq!(parsed.limit, None);
    }

    #[test]
    fn test_parse_credential_empty_disables() {
        assert!(!parse_credential("").is_enabled());
        assert!(!parse_credential(",5").is_enabled());
    }

    #[test]
    fn test_apply_env_overrides() {
        let mut config = AppConfig::default();
        ConfigLoader::apply_env(
            &mut config,
            lookup_from(&[
                ("RSS_URL", " https://blog.example.com/atom.xml "),
                ("INDEX_NOW_KEY", "nowkey,2"),
                ("BING_KEY", "bingkey"),
                ("BAIDU_KEY", ""),
                ("BOT_TOKEN", "123:abc"),
                ("CHAT_ID", "42"),
            ]),
        );

        assert_eq!(config.feed.rss_url, "https://blog.example.com/atom.xml");
        assert_eq!(config.providers.index_now.credential(), "nowkey");
        assert_eq!(config.providers.index_now.limit, Some(2));
        assert_eq!(config.providers.bing.credential(), "bingkey");
        assert!(!config.providers.baidu.is_enabled());
        assert!(config.notifier.is_enabled());
    }

    #[test]
    fn test_apply_env_absent_keeps_lower_layer() {
        let mut config = ConfigLoader::from_toml(
            r#"
            [providers.bing]
            credential = "from-file"
            limit = 4
            "#,
        )
        .unwrap();

        ConfigLoader::apply_env(&mut config, lookup_from(&[]));
        assert_eq!(config.providers.bing.credential(), "from-file");
        assert_eq!(config.providers.bing.limit, Some(4));

        ConfigLoader::apply_env(&mut config, lookup_from(&[("BING_KEY", "")]));
        assert!(!config.providers.bing.is_enabled());
    }

    #[test]
    fn test_load_from_toml() {
        let toml = r#"
            [feed]
            rss_url = "https://blog.example.com/atom.xml"
            precheck_timeout_ms = 5000

            [providers.index_now]
            credential = "nowkey"
            limit = 3

            [providers.google]
            service_account_path = "/etc/indexpush/google.json"

            [dispatch]
            max_workers = 4
            task_timeout_ms = 10000

            [telemetry]
            log_format = "json"
        "#;

        let config = ConfigLoader::from_toml(toml).unwrap();
        assert_eq!(config.feed.precheck_timeout_ms, 5000);
        assert_eq!(config.feed.request_timeout_ms, 30_000);
        assert_eq!(config.providers.index_now.limit, Some(3));
        assert!(!config.providers.bing.is_enabled());
        assert_eq!(config.dispatch.max_workers, 4);
        assert_eq!(config.dispatch.run_timeout_ms, 120_000);
        assert_eq!(config.telemetry.log_format, crate::LogFormat::Json);
        assert_eq!(
            config.providers.google.service_account_path,
            PathBuf::from("/etc/indexpush/google.json")
        );
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"
{
  "feed": { "rss_url": "https://blog.example.com/atom.xml" },
  "providers": {
    "baidu": { "credential": "token" }
  },
  "notifier": { "bot_token": "1:x", "chat_id": "7" }
}
        "#;

        let config = ConfigLoader::from_json(json).unwrap();
        assert_eq!(config.providers.baidu.credential(), "token");
        assert_eq!(config.providers.baidu.limit, None);
        assert_eq!(config.store.path, PathBuf::from("urls.txt"));
        assert!(config.notifier.is_enabled());
    }

    #[test]
    fn test_load_from_file() {
        let toml = r#"
[feed]
rss_url = "https://blog.example.com/atom.xml"

[store]
path = "/tmp/candidates.txt"
        "#;

        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let config = ConfigLoader::from_file(file.path()).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/tmp/candidates.txt"));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(matches!(
            ConfigLoader::from_file(file.path()),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn test_builder_with_file_and_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(b"[dispatch]\nmax_workers = 2\n").unwrap();

        let config = ConfigLoader::builder()
            .add_file(file.path(), true)
            .set_default("feed.rss_url", "https://fallback.example.com/feed")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.dispatch.max_workers, 2);
        assert_eq!(config.dispatch.task_timeout_ms, 30_000);
        assert_eq!(config.feed.rss_url, "https://fallback.example.com/feed");
    }
}
