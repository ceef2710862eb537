use indexpush_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TracingError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.default_filter)
            .map_err(|e| TracingError::InvalidFilter(e.to_string()))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_level(true)
                    .json(),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_level(true))
            .try_init(),
    };

    result.map_err(|e| TracingError::InitError(e.to_string()))
}

/// Correlation ID for one submission run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(uuid::Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Span context for a whole run
#[derive(Debug, Clone)]
pub struct RunSpan {
    pub run_id: RunId,
    pub site: String,
}

impl RunSpan {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            run_id: RunId::new(),
            site: site.into(),
        }
    }

    /// Span to instrument the run future with
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("run", run_id = %self.run_id, site = %self.site)
    }
}

/// Log an error with context and pass it through unchanged
pub trait ErrorContext {
    fn with_run_id(self, run_id: RunId) -> Self;

    fn with_provider(self, provider: &str) -> Self;
}

impl<T, E> ErrorContext for Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_run_id(self, run_id: RunId) -> Self {
        self.map_err(|e| {
            tracing::error!(run_id = %run_id, error = %e, "error occurred");
            e
        })
    }

    fn with_provider(self, provider: &str) -> Self {
        self.map_err(|e| {
            tracing::error!(provider = %provider, error = %e, "error occurred");
            e
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("tracing initialization error: {0}")]
    InitError(String),

    #[error("invalid log filter: {0}")]
    InvalidFilter(String),
}
