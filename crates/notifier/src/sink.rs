use async_trait::async_trait;
use indexpush_transport::TransportError;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("notification rejected: HTTP {0}")]
    Rejected(u16),
}

/// Destination for the rendered run report
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn deliver(&self, report: &str) -> Result<(), NotifyError>;
}

/// Sink used when no messaging channel is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl ReportSink for LogSink {
    async fn deliver(&self, report: &str) -> Result<(), NotifyError> {
        info!(report = %report, "Submission report");
        Ok(())
    }
}
