use async_trait::async_trait;
use indexpush_transport::{HttpRequest, HttpTransport, TEXT_PLAIN_UTF8};
use indexpush_types::{Outcome, ProviderKind};
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::{classify, host_label, Provider, ProviderContext, NOTHING_TO_SUBMIT};

pub const BAIDU_ENDPOINT: &str = "http://data.zz.baidu.com/urls";

/// Baidu push adapter: plain-text body, one URL per line, site and token in the query
pub struct BaiduProvider {
    endpoint: String,
    host: String,
    transport: Arc<dyn HttpTransport>,
}

impl BaiduProvider {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_endpoint(transport, BAIDU_ENDPOINT)
    }

    pub fn with_endpoint(transport: Arc<dyn HttpTransport>, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            host: host_label(&endpoint),
            endpoint,
            transport,
        }
    }

    fn request_url(&self, site_url: &str, token: &str) -> Result<String, url::ParseError> {
        let mut url = Url::parse(&self.endpoint)?;
        url.query_pairs_mut()
            .append_pair("site", site_url)
            .append_pair("token", token);
        Ok(url.into())
    }
}

/// Every URL terminated by a newline
pub fn baidu_body(urls: &[String]) -> String {
    urls.iter().fold(String::new(), |mut body, url| {
        body.push_str(url);
        body.push('\n');
        body
    })
}

#[async_trait]
impl Provider for BaiduProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Baidu
    }

    fn host(&self) -> &str {
        &self.host
    }

    async fn submit(&self, urls: &[String], ctx: &ProviderContext) -> Outcome {
        if urls.is_empty() {
            return Outcome::skipped(&self.host, NOTHING_TO_SUBMIT);
        }

        let request_url = match self.request_url(&ctx.site.site_url, &ctx.credential) {
            Ok(url) => url,
            Err(e) => return Outcome::failure(&self.host, format!("invalid endpoint: {e}")),
        };

        debug!(provider = %self.host, count = urls.len(), "Submitting to Baidu");

        let request = HttpRequest::post(request_url)
            .header("Content-Type", TEXT_PLAIN_UTF8)
            .text(baidu_body(urls));

        let result = self.transport.send(request).await;
        classify(&self.host, urls.len(), result)
    }
}
