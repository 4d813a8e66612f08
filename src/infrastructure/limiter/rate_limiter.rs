use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::{errors::RateLimitError, repositories::rate_limit::RateLimiter};

/// Per-client counter for the current fixed window.
#[derive(Debug, Clone, Copy)]
pub struct WindowBucket {
    count: u32,
    window_started_at: Instant,
}

impl WindowBucket {
    fn new(now: Instant) -> Self {
        Self { count: 1, window_started_at: now }
    }

    fn expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.window_started_at) >= window
    }
}

/// Fixed-window limiter held in process memory.
///
/// Each instance keeps its own view, so separate processes do not share
/// quotas. Buckets are reset when their window lapses but never removed.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    buckets: DashMap<String, WindowBucket>,
    max_requests: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            buckets: DashMap::new(),
            max_requests,
            window,
        }
    }

    /// Same as [`RateLimiter::allow`] with an explicit clock.
    pub fn allow_at(&self, key: &str, now: Instant) -> bool {
        // The entry guard holds the shard lock, so concurrent hits on one key serialize.
        let mut entry = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| WindowBucket { count: 0, window_started_at: now });
        let bucket = entry.value_mut();

        if bucket.count == 0 || bucket.expired(now, self.window) {
            *bucket = WindowBucket::new(now);
            return true;
        }

        if bucket.count >= self.max_requests {
            return false;
        }

        bucket.count += 1;
        true
    }

    /// Current count for `key`, if it has been seen.
    pub fn count_for(&self, key: &str) -> Option<u32> {
        self.buckets.get(key).map(|b| b.count)
    }
}

#[async_trait]
impl RateLimiter for FixedWindowLimiter {
    async fn allow(&self, key: &str) -> Result<bool, RateLimitError> {
        Ok(self.allow_at(key, Instant::now()))
    }

    fn tracked_clients(&self) -> Option<usize> {
        Some(self.buckets.len())
    }
}
