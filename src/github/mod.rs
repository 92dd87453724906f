pub mod client;
pub mod collector;
pub mod paginator;
pub mod rate_limiter;
pub mod retry;

pub use client::{classify_error, GitHubClient};
pub use collector::{GitHubCollector, ProfileSource};
pub use paginator::Paginator;
pub use rate_limiter::{RateLimitInfo, RateLimiter};
pub use retry::retry_with_backoff;
