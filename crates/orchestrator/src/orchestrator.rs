use indexpush_config::{DispatchConfig, ProvidersConfig};
use indexpush_providers::{Provider, ProviderContext};
use indexpush_types::{Outcome, ProviderKind, SiteContext, SubmissionTask};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, error, info, warn};

use crate::report::Report;

/// Reason recorded for a provider whose task panicked
pub const TASK_PANICKED: &str = "task panicked";

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("more than one adapter registered for {0}")]
    DuplicateProvider(ProviderKind),

    #[error("max_workers must be at least 1")]
    NoWorkers,
}

/// Fans one run's candidates out to every enabled provider
///
/// Each provider gets one task on a bounded pool. Tasks report their
/// outcome over a channel to a single collector, so the report is only
/// ever touched by `submit` itself. Every spawned task is either joined
/// or aborted before `submit` returns.
pub struct SubmissionOrchestrator {
    providers: HashMap<ProviderKind, Arc<dyn Provider>>,
    site: SiteContext,
    dispatch: DispatchConfig,
}

impl SubmissionOrchestrator {
    pub fn new(
        providers: Vec<Arc<dyn Provider>>,
        site: SiteContext,
        dispatch: DispatchConfig,
    ) -> Result<Self, OrchestratorError> {
        if dispatch.max_workers == 0 {
            return Err(OrchestratorError::NoWorkers);
        }

        let mut registry = HashMap::with_capacity(providers.len());
        for provider in providers {
            let kind = provider.kind();
            if registry.insert(kind, provider).is_some() {
                return Err(OrchestratorError::DuplicateProvider(kind));
            }
        }

        Ok(Self {
            providers: registry,
            site,
            dispatch,
        })
    }

    /// Resolve one task per enabled provider, in declaration order
    pub fn plan(&self, candidates: &[String], configs: &ProvidersConfig) -> Vec<SubmissionTask> {
        ProviderKind::ALL
            .iter()
            .filter(|kind| self.providers.contains_key(*kind))
            .filter_map(|&kind| SubmissionTask::plan(kind, &configs.get(kind), candidates))
            .collect()
    }

    /// Submit to every enabled provider and collect their outcomes
    pub async fn submit(&self, candidates: &[String], configs: &ProvidersConfig) -> Report {
        let mut report = Report::new();

        if candidates.is_empty() {
            warn!("No candidate URLs, nothing submitted");
            return report;
        }

        let tasks = self.plan(candidates, configs);
        if tasks.is_empty() {
            info!("No providers enabled");
            return report;
        }

        info!(
            candidates = candidates.len(),
            providers = tasks.len(),
            "Dispatching submissions"
        );

        let semaphore = Arc::new(Semaphore::new(self.dispatch.max_workers));
        let (tx, mut rx) = mpsc::channel::<(ProviderKind, Outcome)>(tasks.len());
        let task_timeout = self.dispatch.task_timeout();

        let mut pending: HashMap<ProviderKind, String> = HashMap::with_capacity(tasks.len());
        let mut handles: Vec<(ProviderKind, JoinHandle<()>)> = Vec::with_capacity(tasks.len());

        for task in tasks {
            let Some(provider) = self.providers.get(&task.provider).cloned() else {
                continue;
            };
            let kind = task.provider;
            let host = provider.host().to_string();
            let ctx = ProviderContext::new(self.site.clone(), configs.get(kind).credential());
            let semaphore = semaphore.clone();
            let tx = tx.clone();

            pending.insert(kind, host.clone());

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };

                debug!(provider = %host, count = task.count(), "Submission started");

                let outcome = match timeout(task_timeout, provider.submit(&task.urls, &ctx)).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!(provider = %host, "Submission timed out");
                        Outcome::timeout(&host)
                    }
                };

                // Receiver only goes away once the run deadline has passed
                let _ = tx.send((kind, outcome)).await;
            });

            handles.push((kind, handle));
        }
        drop(tx);

        let deadline = Instant::now() + self.dispatch.run_timeout();
        loop {
            match timeout_at(deadline, rx.recv()).await {
                Ok(Some((kind, outcome))) => {
                    pending.remove(&kind);
                    report.push(outcome);
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(pending = pending.len(), "Run deadline reached");
                    while let Ok((kind, outcome)) = rx.try_recv() {
                        pending.remove(&kind);
                        report.push(outcome);
                    }
                    break;
                }
            }
        }

        for (_, handle) in &handles {
            handle.abort();
        }

        for (kind, handle) in handles {
            let result = handle.await;
            let Some(host) = pending.remove(&kind) else {
                continue;
            };

            match result {
                Err(e) if e.is_panic() => {
                    error!(provider = %host, "Submission task panicked");
                    report.push(Outcome::failure(host, TASK_PANICKED));
                }
                _ => report.push(Outcome::timeout(host)),
            }
        }

        info!(outcomes = report.len(), "Dispatch complete");
        report
    }
}
