use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::github::client::check_status;
use crate::github::rate_limiter::RateLimiter;

pub struct Paginator<'a> {
    client: &'a Client,
    rate_limiter: &'a RateLimiter,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a Client, rate_limiter: &'a RateLimiter) -> Self {
        Self {
            client,
            rate_limiter,
        }
    }

    /// Walks pages until `max_items` are collected or a short page ends the
    /// listing. `subject` names the account in a not-found error.
    pub async fn fetch_limited<T: DeserializeOwned>(
        &self,
        base_url: &str,
        per_page: u32,
        max_items: u32,
        subject: &str,
    ) -> Result<Vec<T>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        while all_items.len() < max_items as usize {
            self.rate_limiter.wait().await;

            let url = page_url(base_url, per_page, page);
            tracing::debug!("Fetching: {}", url);
            let response = self.client.get(&url).send().await?;
            self.rate_limiter.update_from_headers(response.headers()).await;
            let response = check_status(response, subject, self.rate_limiter).await?;

            let items: Vec<T> = response.json().await?;
            let items_count = items.len();
            all_items.extend(items);

            if items_count < per_page as usize {
                break;
            }
            page += 1;
        }

        all_items.truncate(max_items as usize);
        Ok(all_items)
    }
}

fn page_url(base_url: &str, per_page: u32, page: u32) -> String {
    let separator = if base_url.contains('?') { "&" } else { "?" };
    format!("{}{}per_page={}&page={}", base_url, separator, per_page, page)
}
