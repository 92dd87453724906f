//! Builders shared by the engine's unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{Commit, ContentEntry, ReadmeInfo, RepoDetail, Repository, UserData};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 20, 12, 0, 0).unwrap()
}

pub fn repo(name: &str) -> Repository {
    Repository {
        id: name.len() as u64,
        name: name.to_string(),
        full_name: format!("octo/{}", name),
        url: format!("https://github.com/octo/{}", name),
        ..Default::default()
    }
}

pub fn starred(name: &str, stars: u32, forks: u32) -> Repository {
    Repository { stars, forks, ..repo(name) }
}

pub fn readme(length: usize, installation: bool, usage: bool) -> ReadmeInfo {
    ReadmeInfo {
        exists: true,
        length,
        has_installation: installation,
        has_usage: usage,
        ..Default::default()
    }
}

pub fn detail(repo: Repository, readme: ReadmeInfo, contents: Vec<ContentEntry>) -> RepoDetail {
    RepoDetail { repo, readme, languages: Default::default(), contents }
}

/// README with install, usage and contributing sections plus a complete
/// conventional layout.
pub fn well_kept_detail(name: &str) -> RepoDetail {
    detail(
        repo(name),
        ReadmeInfo { has_contributing: true, ..readme(2500, true, true) },
        vec![
            ContentEntry::file(".gitignore"),
            ContentEntry::file("Cargo.toml"),
            ContentEntry::dir("src"),
            ContentEntry::dir(".github"),
        ],
    )
}

pub fn commits_days_ago(now: DateTime<Utc>, days: &[i64]) -> Vec<Commit> {
    days.iter()
        .enumerate()
        .map(|(i, d)| Commit {
            sha: format!("{:040x}", i),
            message: "work".to_string(),
            ..Commit::at(now - Duration::days(*d))
        })
        .collect()
}

pub fn user_data(repositories: Vec<Repository>) -> UserData {
    UserData {
        languages: crate::models::aggregate_languages(&repositories),
        repositories,
        ..Default::default()
    }
}
