use serde::{Deserialize, Serialize};

/// Default per-run cap for Baidu, whose platform quota is small
pub const BAIDU_DEFAULT_LIMIT: usize = 10;

/// The indexing services a run can notify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Key-based IndexNow protocol
    IndexNow,
    /// Bing webmaster batch API
    Bing,
    /// Baidu token-based push API
    Baidu,
    /// Google Indexing API via service account
    Google,
}

impl ProviderKind {
    /// Declaration order, which is also dispatch order
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::IndexNow,
        ProviderKind::Bing,
        ProviderKind::Baidu,
        ProviderKind::Google,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::IndexNow => "indexnow",
            ProviderKind::Bing => "bing",
            ProviderKind::Baidu => "baidu",
            ProviderKind::Google => "google",
        }
    }

    /// Limit applied when the configuration does not set one.
    /// `None` means the whole candidate list.
    pub fn default_limit(&self) -> Option<usize> {
        match self {
            ProviderKind::Baidu => Some(BAIDU_DEFAULT_LIMIT),
            _ => None,
        }
    }

    /// Google authenticates with a service-account file instead of a credential string
    pub fn requires_credential(&self) -> bool {
        !matches!(self, ProviderKind::Google)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Credential and optional submission cap for one provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key or token; `None` disables the provider
    #[serde(default)]
    pub credential: Option<String>,

    /// Maximum URLs to submit per run
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ProviderConfig {
    /// Build a config, treating an empty credential as disabled
    pub fn new(credential: impl Into<String>, limit: Option<usize>) -> Self {
        let credential = credential.into();
        Self {
            credential: if credential.is_empty() {
                None
            } else {
                Some(credential)
            },
            limit,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.credential.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Credential text, empty when disabled
    pub fn credential(&self) -> &str {
        self.credential.as_deref().unwrap_or_default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Resolve how many candidates a provider receives this run.
///
/// Disabled providers resolve to zero. Otherwise the configured limit, or the
/// provider's default limit, or the whole list, clamped to `available`.
pub fn resolve_count(kind: ProviderKind, config: &ProviderConfig, available: usize) -> usize {
    if kind.requires_credential() && !config.is_enabled() {
        return 0;
    }

    let limit = if kind.requires_credential() {
        config.limit.or(kind.default_limit())
    } else {
        None
    };

    limit.unwrap_or(available).min(available)
}
