use async_trait::async_trait;
use indexpush_types::{Outcome, ProviderKind, SiteContext};

/// Everything an adapter needs besides the URLs themselves
#[derive(Clone, Debug)]
pub struct ProviderContext {
    pub site: SiteContext,

    /// Key or token; empty for providers that authenticate another way
    pub credential: String,
}

impl ProviderContext {
    pub fn new(site: SiteContext, credential: impl Into<String>) -> Self {
        Self {
            site,
            credential: credential.into(),
        }
    }
}

/// Core trait that all provider adapters implement
///
/// An adapter turns a slice of URLs into one provider-specific submission
/// and classifies the answer. It never retries and never panics on a bad
/// response; every failure is folded into the returned [`Outcome`].
#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Host label used in outcomes and the report
    fn host(&self) -> &str;

    async fn submit(&self, urls: &[String], ctx: &ProviderContext) -> Outcome;
}
