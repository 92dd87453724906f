use std::collections::BTreeMap;

use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::github::paginator::Paginator;
use crate::github::rate_limiter::{RateLimitInfo, RateLimiter};
use crate::github::retry::retry_with_backoff;
use crate::models::{
    ApiRepository, Commit, CommitSummary, ContentEntry, GitHubUser, ReadmeInfo, Repository,
};

pub const API_BASE_URL: &str = "https://api.github.com";
const REPOS_PER_PAGE: u32 = 30;
const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

impl GitHubClient {
    /// Without a token requests are anonymous and GitHub allows 60 per hour.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("gitsoar/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(),
            base_url: API_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn get_user(&self, username: &str) -> Result<GitHubUser> {
        let url = format!("{}/users/{}", self.base_url, username);
        tracing::debug!("Fetching user: {}", username);
        let url = url.as_str();
        retry_with_backoff("get_user", || self.get_json(url, username)).await
    }

    /// Most recently updated repositories first, at most `max`.
    pub async fn get_user_repos(&self, username: &str, max: u32) -> Result<Vec<Repository>> {
        let url = format!(
            "{}/users/{}/repos?sort=updated&direction=desc",
            self.base_url, username
        );
        tracing::debug!("Fetching repositories for: {}", username);

        let url = url.as_str();
        let repos: Vec<ApiRepository> = retry_with_backoff("get_user_repos", || async move {
            Paginator::new(&self.client, &self.rate_limiter)
                .fetch_limited(url, REPOS_PER_PAGE, max, username)
                .await
        })
        .await?;

        Ok(repos.into_iter().map(Repository::from).collect())
    }

    /// A 404 means the repository has no README; other failures propagate.
    pub async fn get_readme(&self, owner: &str, repo: &str) -> Result<ReadmeInfo> {
        let url = format!("{}/repos/{}/{}/readme", self.base_url, owner, repo);
        tracing::debug!("Fetching README: {}/{}", owner, repo);

        let response = self.send(&url, Some(RAW_MEDIA_TYPE)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(ReadmeInfo::missing());
        }

        let content = check_status(response, owner, &self.rate_limiter).await?.text().await?;
        Ok(ReadmeInfo::from_content(&content))
    }

    /// Bytes per language; empty on any failure.
    pub async fn get_repo_languages(&self, owner: &str, repo: &str) -> BTreeMap<String, u64> {
        let url = format!("{}/repos/{}/{}/languages", self.base_url, owner, repo);
        self.get_json(&url, owner).await.unwrap_or_else(|e| {
            tracing::debug!("Languages unavailable for {}/{}: {}", owner, repo, e);
            BTreeMap::new()
        })
    }

    /// Root directory listing; empty on any failure.
    pub async fn get_repo_contents(&self, owner: &str, repo: &str) -> Vec<ContentEntry> {
        let url = format!("{}/repos/{}/{}/contents", self.base_url, owner, repo);
        self.get_json(&url, owner).await.unwrap_or_else(|e| {
            tracing::debug!("Contents unavailable for {}/{}: {}", owner, repo, e);
            Vec::new()
        })
    }

    /// One page of the newest commits, at most 100; empty on any failure.
    pub async fn get_repo_commits(&self, owner: &str, repo: &str, max: u32) -> Vec<Commit> {
        let url = format!(
            "{}/repos/{}/{}/commits?per_page={}",
            self.base_url,
            owner,
            repo,
            max.clamp(1, 100)
        );
        tracing::debug!("Fetching commits for: {}/{}", owner, repo);

        match self.get_json::<Vec<CommitSummary>>(&url, owner).await {
            Ok(summaries) => summaries.into_iter().map(Commit::from).collect(),
            Err(e) => {
                tracing::debug!("Commits unavailable for {}/{}: {}", owner, repo, e);
                Vec::new()
            }
        }
    }

    /// Whether `{username}/{username}` has a README.
    pub async fn has_profile_readme(&self, username: &str) -> bool {
        let url = format!("{}/repos/{}/{}/readme", self.base_url, username, username);
        match self.send(&url, None).await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn send(&self, url: &str, accept: Option<&'static str>) -> Result<Response> {
        self.rate_limiter.wait().await;

        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header(header::ACCEPT, accept);
        }
        let response = request.send().await?;
        self.rate_limiter.update_from_headers(response.headers()).await;
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, subject: &str) -> Result<T> {
        let response = self.send(url, None).await?;
        Ok(check_status(response, subject, &self.rate_limiter).await?.json().await?)
    }
}

/// Passes successful responses through and turns the rest into errors.
/// Rate-limit fields missing from the response are filled from the last
/// values the limiter saw.
pub(crate) async fn check_status(
    response: Response,
    subject: &str,
    rate_limiter: &RateLimiter,
) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let info = RateLimitInfo::from_headers(response.headers()).or(rate_limiter.snapshot().await);
    let body = response.text().await.unwrap_or_default();
    Err(classify_error(status, &info, &body, subject))
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Maps a non-success GitHub response onto the error taxonomy.
pub fn classify_error(status: StatusCode, info: &RateLimitInfo, body: &str, subject: &str) -> Error {
    if status == StatusCode::NOT_FOUND {
        return Error::UserNotFound(subject.to_string());
    }

    let throttled = matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
        && (info.is_exhausted() || body.to_lowercase().contains("rate limit"));
    if throttled {
        return Error::RateLimited {
            reset_at: info.reset_at,
            limit: info.limit,
            remaining: info.remaining.unwrap_or(0),
        };
    }

    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        });

    Error::Upstream {
        status: status.as_u16(),
        message,
    }
}
