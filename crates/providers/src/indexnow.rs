use async_trait::async_trait;
use indexpush_transport::{HttpRequest, HttpTransport};
use indexpush_types::{Outcome, ProviderKind};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::{classify, host_label, Provider, ProviderContext, NOTHING_TO_SUBMIT};

pub const INDEXNOW_ENDPOINT: &str = "https://api.indexnow.org/IndexNow";

/// IndexNow adapter: one JSON POST carrying the site key and URL list
pub struct IndexNowProvider {
    endpoint: String,
    host: String,
    transport: Arc<dyn HttpTransport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexNowRequest<'a> {
    host: &'a str,
    key: &'a str,
    key_location: String,
    url_list: &'a [String],
}

impl IndexNowProvider {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_endpoint(transport, INDEXNOW_ENDPOINT)
    }

    pub fn with_endpoint(transport: Arc<dyn HttpTransport>, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            host: host_label(&endpoint),
            endpoint,
            transport,
        }
    }
}

#[async_trait]
impl Provider for IndexNowProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::IndexNow
    }

    fn host(&self) -> &str {
        &self.host
    }

    async fn submit(&self, urls: &[String], ctx: &ProviderContext) -> Outcome {
        if urls.is_empty() {
            return Outcome::skipped(&self.host, NOTHING_TO_SUBMIT);
        }

        let payload = IndexNowRequest {
            host: &ctx.site.host,
            key: &ctx.credential,
            key_location: ctx.site.key_location(&ctx.credential),
            url_list: urls,
        };

        let body = match serde_json::to_value(&payload) {
            Ok(body) => body,
            Err(e) => return Outcome::failure(&self.host, e.to_string()),
        };

        debug!(provider = %self.host, count = urls.len(), "Submitting to IndexNow");

        let result = self
            .transport
            .send(HttpRequest::post(&self.endpoint).json(body))
            .await;

        classify(&self.host, urls.len(), result)
    }
}
