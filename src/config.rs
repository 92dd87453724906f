use std::env;
use std::time::Duration;

pub const DEFAULT_CACHE_SECS: u64 = 86_400;

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub cache_ttl: Duration,
    pub max_repos: u32,
    pub detail_repos: usize,
    pub commit_repos: usize,
    pub commits_per_repo: u32,
    pub concurrency_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_SECS),
            max_repos: 30,
            detail_repos: 10,
            commit_repos: 5,
            commits_per_repo: 50,
            concurrency_limit: 5,
        }
    }
}

impl Config {
    /// Unset or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        // Unauthenticated access works, just with a much lower rate limit.
        let github_token = env::var("GITHUB_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        if github_token.is_none() {
            tracing::warn!("GITHUB_TOKEN not set, using unauthenticated access (60 req/hour)");
        }

        let cache_ttl = env::var("CACHE_DURATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);

        Self {
            github_token,
            cache_ttl,
            max_repos: parse_var("MAX_REPOS").unwrap_or(defaults.max_repos),
            detail_repos: parse_var("DETAIL_REPOS").unwrap_or(defaults.detail_repos),
            commit_repos: parse_var("COMMIT_REPOS").unwrap_or(defaults.commit_repos),
            commits_per_repo: parse_var("COMMITS_PER_REPO").unwrap_or(defaults.commits_per_repo),
            concurrency_limit: parse_var("CONCURRENCY_LIMIT")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.concurrency_limit),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Caps the collector applies while assembling one `UserData` snapshot.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub max_repos: u32,
    pub detail_repos: usize,
    pub commit_repos: usize,
    pub commits_per_repo: u32,
    pub concurrency_limit: usize,
    pub show_progress: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for FetchConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_repos: config.max_repos,
            detail_repos: config.detail_repos,
            commit_repos: config.commit_repos,
            commits_per_repo: config.commits_per_repo,
            concurrency_limit: config.concurrency_limit,
            show_progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_config_follows_config_caps() {
        let config = Config { max_repos: 12, detail_repos: 4, ..Default::default() };
        let fetch = FetchConfig::from(&config);
        assert_eq!(fetch.max_repos, 12);
        assert_eq!(fetch.detail_repos, 4);
        assert_eq!(fetch.commit_repos, 5);
        assert!(fetch.show_progress);
    }

    #[test]
    fn unparseable_numbers_fall_back() {
        env::set_var("GITSOAR_TEST_NUMBER", " 42 ");
        env::set_var("GITSOAR_TEST_GARBAGE", "many");
        assert_eq!(parse_var::<u32>("GITSOAR_TEST_NUMBER"), Some(42));
        assert_eq!(parse_var::<u32>("GITSOAR_TEST_GARBAGE"), None);
        assert_eq!(parse_var::<u32>("GITSOAR_TEST_UNSET"), None);
    }
}
