use crate::{resolve_count, ProviderConfig, ProviderKind};

/// One provider plus the URLs it will receive in this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTask {
    pub provider: ProviderKind,
    pub urls: Vec<String>,
}

impl SubmissionTask {
    /// Plan a task for `provider`, or `None` when the provider is disabled.
    ///
    /// URLs are always the first `count` candidates in list order.
    pub fn plan(
        provider: ProviderKind,
        config: &ProviderConfig,
        candidates: &[String],
    ) -> Option<Self> {
        if provider.requires_credential() && !config.is_enabled() {
            return None;
        }

        let count = resolve_count(provider, config, candidates.len());
        Some(Self {
            provider,
            urls: candidates[..count].to_vec(),
        })
    }

    pub fn count(&self) -> usize {
        self.urls.len()
    }
}
