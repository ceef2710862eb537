use indexpush_transport::{HttpResponse, TransportError};
use indexpush_types::Outcome;
use tracing::{info, warn};

pub const HTTP_OK: u16 = 200;
pub const HTTP_BAD_REQUEST: u16 = 400;

/// Skip reason when a provider resolves to zero URLs
pub const NOTHING_TO_SUBMIT: &str = "no URLs to submit";

/// Map one HTTP exchange onto an [`Outcome`].
///
/// 200 is success, 400 means the provider's quota is exhausted, anything
/// else (including transport errors) is a failure.
pub fn classify(
    host: &str,
    count: usize,
    result: Result<HttpResponse, TransportError>,
) -> Outcome {
    match result {
        Ok(response) => classify_status(host, count, response.status),
        Err(e) => {
            warn!(provider = %host, error = %e, "Submission request failed");
            Outcome::failure(host, e.to_string())
        }
    }
}

pub fn classify_status(host: &str, count: usize, status: u16) -> Outcome {
    match status {
        HTTP_OK => {
            info!(provider = %host, count, "Submission accepted");
            Outcome::success(host, count)
        }
        HTTP_BAD_REQUEST => {
            warn!(provider = %host, "Submission quota exhausted");
            Outcome::quota_exceeded(host)
        }
        other => {
            warn!(provider = %host, status = other, "Submission rejected");
            Outcome::failure(host, format!("HTTP {other}"))
        }
    }
}

/// Host part of an endpoint URL, falling back to the raw string
pub fn host_label(endpoint: &str) -> String {
    url::Url::parse(endpoint)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| endpoint.to_string())
}
