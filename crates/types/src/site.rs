use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SiteError {
    #[error("invalid feed url: {0}")]
    InvalidUrl(String),

    #[error("feed url has no host: {0}")]
    MissingHost(String),
}

/// Site identity derived from the feed URL, handed to every provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContext {
    /// Scheme of the feed URL (`http` or `https`)
    pub scheme: String,

    /// Bare host name, e.g. `blog.example.com`
    pub host: String,

    /// `scheme://host`
    pub site_url: String,
}

impl SiteContext {
    pub fn from_feed_url(feed_url: &str) -> Result<Self, SiteError> {
        let url = Url::parse(feed_url).map_err(|e| SiteError::InvalidUrl(e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| SiteError::MissingHost(feed_url.to_string()))?
            .to_string();
        let scheme = url.scheme().to_string();

        Ok(Self {
            site_url: format!("{scheme}://{host}"),
            scheme,
            host,
        })
    }

    /// Location of the IndexNow key file proving site ownership
    pub fn key_location(&self, key: &str) -> String {
        format!("{}/{}.txt", self.site_url, key)
    }
}
