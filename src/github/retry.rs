use std::future::Future;

use tokio::time::{sleep, Duration};

use crate::error::Result;

pub const MAX_ATTEMPTS: u32 = 3;
pub const BASE_DELAY: Duration = Duration::from_secs(1);

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// `MAX_ATTEMPTS` is reached. Delays double after each failure: 1s, 2s.
pub async fn retry_with_backoff<T, F, Fut>(label: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                let delay = BASE_DELAY * 2u32.pow(attempt - 1);
                tracing::warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {:?}",
                    label,
                    attempt,
                    MAX_ATTEMPTS,
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
