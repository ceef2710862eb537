use serde::{Deserialize, Serialize};

/// Reason recorded when a submission does not finish in time
pub const TIMEOUT_REASON: &str = "timeout";

/// Classified result of one provider submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Provider accepted `count` URLs
    Success { provider: String, count: usize },

    /// Provider answered HTTP 400, its daily quota is used up
    QuotaExceeded { provider: String },

    /// Any other status code, transport error or timeout
    Failure { provider: String, reason: String },

    /// Provider was not contacted at all
    Skipped { provider: String, reason: String },
}

impl Outcome {
    pub fn success(provider: impl Into<String>, count: usize) -> Self {
        Outcome::Success {
            provider: provider.into(),
            count,
        }
    }

    pub fn quota_exceeded(provider: impl Into<String>) -> Self {
        Outcome::QuotaExceeded {
            provider: provider.into(),
        }
    }

    pub fn failure(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Outcome::Failure {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn skipped(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Outcome::Skipped {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn timeout(provider: impl Into<String>) -> Self {
        Self::failure(provider, TIMEOUT_REASON)
    }

    /// Host label of the provider that produced this outcome
    pub fn provider(&self) -> &str {
        match self {
            Outcome::Success { provider, .. }
            | Outcome::QuotaExceeded { provider }
            | Outcome::Failure { provider, .. }
            | Outcome::Skipped { provider, .. } => provider,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Outcome::QuotaExceeded { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped { .. })
    }
}
