use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::commit::Commit;
use super::repository::{RepoDetail, Repository};

/// `/users/{username}` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub id: u64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub public_repos: u32,
    pub followers: u32,
    pub following: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub profile_url: Option<String>,
    pub followers: u32,
    pub following: u32,
    pub public_repos: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub has_profile_readme: bool,
}

impl Profile {
    pub fn from_user(user: GitHubUser, has_profile_readme: bool) -> Self {
        Self {
            username: user.login,
            name: user.name,
            avatar_url: Some(user.avatar_url),
            bio: user.bio,
            company: user.company,
            location: user.location,
            blog: user.blog.filter(|b| !b.is_empty()),
            profile_url: Some(user.html_url),
            followers: user.followers,
            following: user.following,
            public_repos: user.public_repos,
            created_at: Some(user.created_at),
            has_profile_readme,
        }
    }
}

/// Immutable snapshot of one account, assembled by the collector before
/// any scoring runs.
///
/// `repo_details` holds the top repositories by stars (descending) with
/// README, language and root-listing data attached. `commits` is a sample
/// drawn from the most starred repositories, not the full history.
/// `languages` counts repositories per primary language.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserData {
    pub profile: Profile,
    pub repositories: Vec<Repository>,
    pub repo_details: Vec<RepoDetail>,
    pub commits: Vec<Commit>,
    pub languages: BTreeMap<String, u32>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl UserData {
    pub fn total_stars(&self) -> u64 {
        self.repositories.iter().map(|r| r.stars as u64).sum()
    }

    pub fn total_forks(&self) -> u64 {
        self.repositories.iter().map(|r| r.forks as u64).sum()
    }

    pub fn original_repo_count(&self) -> usize {
        self.repositories.iter().filter(|r| !r.fork).count()
    }
}

/// Counts repositories by their primary language.
pub fn aggregate_languages(repos: &[Repository]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for language in repos.iter().filter_map(|r| r.language.as_ref()) {
        *counts.entry(language.clone()).or_insert(0) += 1;
    }
    counts
}
