use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// Polite ceiling on requests per minute, well under GitHub's own limits.
pub const REQUESTS_PER_MINUTE: u32 = 30;

/// Rate-limit headers of one response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
    pub reset_at: Option<DateTime<Utc>>,
}

impl RateLimitInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: header_number(headers, "x-ratelimit-limit"),
            remaining: header_number(headers, "x-ratelimit-remaining"),
            reset_at: header_number::<i64>(headers, "x-ratelimit-reset")
                .and_then(|epoch| DateTime::from_timestamp(epoch, 0)),
        }
    }

    /// Fills fields this response lacked from `fallback`.
    pub fn or(self, fallback: RateLimitInfo) -> Self {
        Self {
            limit: self.limit.or(fallback.limit),
            remaining: self.remaining.or(fallback.remaining),
            reset_at: self.reset_at.or(fallback.reset_at),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

pub struct RateLimiter {
    state: Arc<Mutex<RateLimitState>>,
    per_minute: u32,
}

struct RateLimitState {
    last_seen: RateLimitInfo,
    requests_this_minute: u32,
    minute_start: Instant,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_per_minute(REQUESTS_PER_MINUTE)
    }

    pub fn with_per_minute(per_minute: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimitState {
                last_seen: RateLimitInfo::default(),
                requests_this_minute: 0,
                minute_start: Instant::now(),
            })),
            per_minute: per_minute.max(1),
        }
    }

    /// Waits for a free slot in the current one-minute window. Exhausted
    /// quotas are not waited out here; the request goes through and the 403
    /// is reported to the caller.
    pub async fn wait(&self) {
        loop {
            let mut state = self.state.lock().await;

            let minute_elapsed = state.minute_start.elapsed();
            if minute_elapsed >= Duration::from_secs(60) {
                // Only the first waiter to see the stale window opens a new one.
                state.requests_this_minute = 0;
                state.minute_start = Instant::now();
            }

            if state.requests_this_minute < self.per_minute {
                state.requests_this_minute += 1;
                return;
            }

            let wait_time = Duration::from_secs(60).saturating_sub(minute_elapsed);
            drop(state);
            tracing::debug!("Soft rate limiting, waiting {:?}", wait_time);
            sleep(wait_time).await;
        }
    }

    pub async fn update_from_headers(&self, headers: &HeaderMap) {
        let info = RateLimitInfo::from_headers(headers);
        if info.remaining.is_none() {
            return;
        }

        if let Some(remaining) = info.remaining.filter(|r| *r < 10) {
            tracing::warn!("GitHub rate limit nearly exhausted: {} requests left", remaining);
        }
        self.state.lock().await.last_seen = info;
    }

    /// Most recent rate-limit headers seen, if any response carried them.
    pub async fn snapshot(&self) -> RateLimitInfo {
        self.state.lock().await.last_seen
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
