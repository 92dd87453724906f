use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::github::client::GitHubClient;
use crate::models::{aggregate_languages, Commit, Profile, RepoDetail, Repository, UserData};

/// Anything that can assemble a complete `UserData` snapshot for an account.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fails with `Error::UserNotFound` or `Error::RateLimited` when GitHub
    /// says so; optional per-repository data degrades to empty instead.
    async fn fetch_user_data(&self, username: &str) -> Result<UserData>;
}

/// Fetches everything the scoring engine needs from the GitHub REST API.
pub struct GitHubCollector {
    client: Arc<GitHubClient>,
    config: FetchConfig,
}

impl GitHubCollector {
    pub fn new(client: GitHubClient, config: FetchConfig) -> Self {
        Self {
            client: Arc::new(client),
            config,
        }
    }

    async fn fetch_details(&self, username: &str, top: &[Repository]) -> Result<Vec<RepoDetail>> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit.max(1)));
        let pb = self.progress_bar(top.len() as u64, "repos");

        let detail_futures = top.iter().map(|repo| {
            let sem = semaphore.clone();
            let pb = pb.clone();
            async move {
                let _permit = sem.acquire().await.ok();
                let (readme, languages, contents) = tokio::join!(
                    self.client.get_readme(username, &repo.name),
                    self.client.get_repo_languages(username, &repo.name),
                    self.client.get_repo_contents(username, &repo.name),
                );
                pb.inc(1);

                Ok::<_, Error>(RepoDetail {
                    repo: repo.clone(),
                    readme: readme?,
                    languages,
                    contents,
                })
            }
        });

        let details = join_all(detail_futures).await;
        pb.finish_with_message("Fetched repository details");
        details.into_iter().collect()
    }

    async fn fetch_commits(&self, username: &str, top: &[Repository]) -> Vec<Commit> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit.max(1)));
        let per_repo = self.config.commits_per_repo;

        let commit_futures = top.iter().map(|repo| {
            let sem = semaphore.clone();
            async move {
                let _permit = sem.acquire().await.ok();
                self.client.get_repo_commits(username, &repo.name, per_repo).await
            }
        });

        join_all(commit_futures).await.into_iter().flatten().collect()
    }

    fn progress_bar(&self, len: u64, unit: &str) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let template = format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {}",
            unit
        );
        let style = ProgressStyle::default_bar()
            .template(&template)
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        ProgressBar::new(len).with_style(style)
    }
}

#[async_trait]
impl ProfileSource for GitHubCollector {
    async fn fetch_user_data(&self, username: &str) -> Result<UserData> {
        tracing::info!("Fetching GitHub profile for: {}", username);
        let (user, repositories) = tokio::try_join!(
            self.client.get_user(username),
            self.client.get_user_repos(username, self.config.max_repos),
        )?;
        tracing::info!("Found {} repositories", repositories.len());

        let top = top_by_stars(&repositories, self.config.detail_repos);
        let repo_details = self.fetch_details(username, &top).await?;

        let commit_repos = &top[..self.config.commit_repos.min(top.len())];
        let commits = self.fetch_commits(username, commit_repos).await;
        tracing::info!("Sampled {} commits from {} repositories", commits.len(), commit_repos.len());

        let has_profile_readme = self.client.has_profile_readme(username).await;

        Ok(UserData {
            profile: Profile::from_user(user, has_profile_readme),
            languages: aggregate_languages(&repositories),
            repositories,
            repo_details,
            commits,
            fetched_at: Some(Utc::now()),
        })
    }
}

/// The `n` most starred repositories; ties keep their listing order.
pub fn top_by_stars(repos: &[Repository], n: usize) -> Vec<Repository> {
    let mut sorted = repos.to_vec();
    sorted.sort_by(|a, b| b.stars.cmp(&a.stars));
    sorted.truncate(n);
    sorted
}
