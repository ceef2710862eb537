//! indexpush
//!
//! Reads the newest entries of an Atom feed, submits their URLs to the
//! IndexNow, Bing, Baidu and Google indexing APIs, and sends the operator a
//! one-message summary of how each provider answered.

use indexpush_config::AppConfig;
use indexpush_feed::{fetch_candidate_ids, precheck, CandidateStore, FeedError};
use indexpush_notifier::{LogSink, ReportSink, TelegramSink};
use indexpush_orchestrator::{OrchestratorError, Report, SubmissionOrchestrator};
use indexpush_providers::{BaiduProvider, BingProvider, GoogleProvider, IndexNowProvider, Provider};
use indexpush_transport::HttpTransport;
use indexpush_types::{CandidateList, SiteContext, SiteError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Site(#[from] SiteError),

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

/// One run: ingest the feed, submit, report
pub struct Pipeline {
    config: AppConfig,
    transport: Arc<dyn HttpTransport>,
}

impl Pipeline {
    pub fn new(config: AppConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn site(&self) -> Result<SiteContext, PipelineError> {
        Ok(SiteContext::from_feed_url(&self.config.feed.rss_url)?)
    }

    /// Precheck the feed, refresh the candidate store and read it back
    pub async fn ingest(&self) -> Result<CandidateList, PipelineError> {
        let feed = &self.config.feed;
        let transport = self.transport.as_ref();

        precheck(transport, &feed.rss_url, feed.precheck_timeout()).await?;
        let ids = fetch_candidate_ids(transport, &feed.rss_url, feed.request_timeout()).await?;

        let store = CandidateStore::new(&self.config.store.path);
        store.write(&ids).await?;
        Ok(store.read().await)
    }

    /// The four adapters, sharing one transport
    pub fn providers(&self) -> Vec<Arc<dyn Provider>> {
        let transport = self.transport.clone();
        vec![
            Arc::new(IndexNowProvider::new(transport.clone())),
            Arc::new(BingProvider::new(transport.clone())),
            Arc::new(BaiduProvider::new(transport.clone())),
            Arc::new(GoogleProvider::new(
                transport,
                &self.config.providers.google.service_account_path,
            )),
        ]
    }

    pub fn sink(&self) -> Box<dyn ReportSink> {
        let notifier = &self.config.notifier;
        if notifier.is_enabled() {
            Box::new(TelegramSink::new(
                self.transport.clone(),
                &notifier.bot_token,
                &notifier.chat_id,
            ))
        } else {
            Box::new(LogSink)
        }
    }

    pub async fn submit(&self, candidates: &[String]) -> Result<Report, PipelineError> {
        let orchestrator = SubmissionOrchestrator::new(
            self.providers(),
            self.site()?,
            self.config.dispatch.clone(),
        )?;
        Ok(orchestrator.submit(candidates, &self.config.providers).await)
    }

    /// Delivery problems are logged and otherwise ignored
    pub async fn deliver(&self, report: &Report) {
        if let Err(e) = self.sink().deliver(&report.render()).await {
            warn!(error = %e, "Failed to deliver report");
        }
    }

    /// Full run. `Ok(None)` means the feed produced nothing to submit.
    pub async fn run(&self) -> Result<Option<Report>, PipelineError> {
        let candidates = self.ingest().await?;
        if candidates.is_empty() {
            error!(store = %self.config.store.path.display(), "Nothing to submit");
            return Ok(None);
        }

        info!(count = candidates.len(), "Candidates loaded");
        let report = self.submit(&candidates).await?;
        self.deliver(&report).await;
        Ok(Some(report))
    }
}
