use async_trait::async_trait;
use indexpush_transport::{HttpRequest, HttpTransport};
use indexpush_types::{Outcome, ProviderKind};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    classify_status, fetch_access_token, host_label, load_service_account, Provider,
    ProviderContext, HTTP_OK, INDEXING_SCOPE, NOTHING_TO_SUBMIT,
};

pub const GOOGLE_ENDPOINT: &str = "https://indexing.googleapis.com/v3/urlNotifications:publish";
pub const URL_UPDATED: &str = "URL_UPDATED";
pub const MISSING_SERVICE_ACCOUNT: &str = "service account file not found";

/// Google Indexing API adapter
///
/// Authenticates with a service-account key file and publishes one
/// `URL_UPDATED` notification per URL. The first non-200 answer ends the
/// batch: 400 reports quota exhaustion, anything else a failure.
pub struct GoogleProvider {
    endpoint: String,
    host: String,
    service_account_path: PathBuf,
    transport: Arc<dyn HttpTransport>,
}

impl GoogleProvider {
    pub fn new(transport: Arc<dyn HttpTransport>, service_account_path: impl Into<PathBuf>) -> Self {
        Self::with_endpoint(transport, service_account_path, GOOGLE_ENDPOINT)
    }

    pub fn with_endpoint(
        transport: Arc<dyn HttpTransport>,
        service_account_path: impl Into<PathBuf>,
        endpoint: impl Into<String>,
    ) -> Self {
        let endpoint = endpoint.into();
        Self {
            host: host_label(&endpoint),
            endpoint,
            service_account_path: service_account_path.into(),
            transport,
        }
    }

    async fn publish(&self, token: &str, urls: &[String]) -> Outcome {
        for (index, url) in urls.iter().enumerate() {
            let request = HttpRequest::post(&self.endpoint)
                .header("Authorization", format!("Bearer {token}"))
                .json(json!({ "url": url, "type": URL_UPDATED }));

            match self.transport.send(request).await {
                Ok(response) if response.status == HTTP_OK => {
                    debug!(provider = %self.host, index, "URL notification published");
                }
                Ok(response) => return classify_status(&self.host, urls.len(), response.status),
                Err(e) => {
                    warn!(provider = %self.host, index, error = %e, "URL notification failed");
                    return Outcome::failure(&self.host, e.to_string());
                }
            }
        }

        classify_status(&self.host, urls.len(), HTTP_OK)
    }
}

#[async_trait]
impl Provider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn host(&self) -> &str {
        &self.host
    }

    async fn submit(&self, urls: &[String], _ctx: &ProviderContext) -> Outcome {
        if urls.is_empty() {
            return Outcome::skipped(&self.host, NOTHING_TO_SUBMIT);
        }

        if !self.service_account_path.exists() {
            info!(
                provider = %self.host,
                path = %self.service_account_path.display(),
                "No service account file, skipping"
            );
            return Outcome::skipped(&self.host, MISSING_SERVICE_ACCOUNT);
        }

        let key = match load_service_account(&self.service_account_path) {
            Ok(key) => key,
            Err(e) => {
                warn!(provider = %self.host, error = %e, "Unusable service account file");
                return Outcome::failure(&self.host, e.to_string());
            }
        };

        let token = match fetch_access_token(self.transport.as_ref(), &key, INDEXING_SCOPE).await {
            Ok(token) => token,
            Err(e) => {
                warn!(provider = %self.host, error = %e, "Access token request failed");
                return Outcome::failure(&self.host, e.to_string());
            }
        };

        self.publish(&token, urls).await
    }
}
