use async_trait::async_trait;

use crate::errors::RateLimitError;

/// Admission control keyed by client identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Records one attempt for `key` and reports whether it is within quota.
    async fn allow(&self, key: &str) -> Result<bool, RateLimitError>;

    /// Number of client keys currently tracked, when the backend can tell.
    fn tracked_clients(&self) -> Option<usize> {
        None
    }
}
