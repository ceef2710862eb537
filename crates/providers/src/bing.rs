use async_trait::async_trait;
use indexpush_transport::{HttpRequest, HttpTransport};
use indexpush_types::{Outcome, ProviderKind};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::{classify, host_label, Provider, ProviderContext, NOTHING_TO_SUBMIT};

pub const BING_ENDPOINT: &str = "https://ssl.bing.com/webmaster/api.svc/json/SubmitUrlbatch";

/// Bing Webmaster batch adapter; the API key travels as the `apikey` query parameter
pub struct BingProvider {
    endpoint: String,
    host: String,
    transport: Arc<dyn HttpTransport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitUrlBatch<'a> {
    site_url: &'a str,
    url_list: &'a [String],
}

impl BingProvider {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_endpoint(transport, BING_ENDPOINT)
    }

    pub fn with_endpoint(transport: Arc<dyn HttpTransport>, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            host: host_label(&endpoint),
            endpoint,
            transport,
        }
    }

    fn request_url(&self, api_key: &str) -> Result<String, url::ParseError> {
        let mut url = Url::parse(&self.endpoint)?;
        url.query_pairs_mut().append_pair("apikey", api_key);
        Ok(url.into())
    }
}

#[async_trait]
impl Provider for BingProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Bing
    }

    fn host(&self) -> &str {
        &self.host
    }

    async fn submit(&self, urls: &[String], ctx: &ProviderContext) -> Outcome {
        if urls.is_empty() {
            return Outcome::skipped(&self.host, NOTHING_TO_SUBMIT);
        }

        let request_url = match self.request_url(&ctx.credential) {
            Ok(url) => url,
            Err(e) => return Outcome::failure(&self.host, format!("invalid endpoint: {e}")),
        };

        let payload = SubmitUrlBatch {
            site_url: &ctx.site.site_url,
            url_list: urls,
        };
        let body = match serde_json::to_value(&payload) {
            Ok(body) => body,
            Err(e) => return Outcome::failure(&self.host, e.to_string()),
        };

        debug!(provider = %self.host, count = urls.len(), "Submitting to Bing");

        let result = self
            .transport
            .send(HttpRequest::post(request_url).json(body))
            .await;

        classify(&self.host, urls.len(), result)
    }
}
