use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `/users/{username}/repos` item, as GitHub sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub homepage: Option<String>,
    pub fork: bool,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub watchers_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub license: Option<ApiLicense>,
    pub size: u64,
    #[serde(default)]
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiLicense {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub homepage: Option<String>,
    pub fork: bool,
    pub stars: u32,
    pub forks: u32,
    pub watchers: u32,
    pub open_issues: u32,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub license: Option<String>,
    /// Kilobytes, as reported by GitHub.
    pub size: u64,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
}

impl From<ApiRepository> for Repository {
    fn from(api: ApiRepository) -> Self {
        Self {
            id: api.id,
            name: api.name,
            full_name: api.full_name,
            description: api.description,
            url: api.html_url,
            homepage: api.homepage,
            fork: api.fork,
            stars: api.stargazers_count,
            forks: api.forks_count,
            watchers: api.watchers_count,
            open_issues: api.open_issues_count,
            language: api.language,
            topics: api.topics,
            license: api.license.map(|l| l.name),
            size: api.size,
            archived: api.archived,
            created_at: api.created_at,
            updated_at: api.updated_at,
            pushed_at: api.pushed_at,
        }
    }
}

impl Repository {
    pub fn has_description(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.is_empty())
    }

    pub fn has_homepage(&self) -> bool {
        self.homepage.as_deref().is_some_and(|h| !h.is_empty())
    }
}

/// Flags derived from a repository's README text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReadmeInfo {
    pub exists: bool,
    /// Length in characters.
    pub length: usize,
    pub has_installation: bool,
    pub has_usage: bool,
    pub has_contributing: bool,
    pub has_license: bool,
}

impl ReadmeInfo {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn from_content(content: &str) -> Self {
        let lower = content.to_lowercase();
        Self {
            exists: true,
            length: content.chars().count(),
            has_installation: lower.contains("install"),
            has_usage: lower.contains("usage"),
            has_contributing: lower.contains("contributing"),
            has_license: lower.contains("license"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// One entry of a repository's root listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub size: u64,
}

impl ContentEntry {
    pub fn file(name: &str) -> Self {
        Self { name: name.to_string(), kind: EntryKind::File, path: name.to_string(), size: 0 }
    }

    pub fn dir(name: &str) -> Self {
        Self { name: name.to_string(), kind: EntryKind::Dir, path: name.to_string(), size: 0 }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// A repository with README, language bytes and root listing attached.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RepoDetail {
    #[serde(flatten)]
    pub repo: Repository,
    pub readme: ReadmeInfo,
    pub languages: BTreeMap<String, u64>,
    pub contents: Vec<ContentEntry>,
}

impl RepoDetail {
    pub fn lowercase_names(&self) -> impl Iterator<Item = String> + '_ {
        self.contents.iter().map(|c| c.name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readme_flags_are_case_insensitive() {
        let info = ReadmeInfo::from_content("# Tool\n## INSTALLATION\n## Usage\nSee CONTRIBUTING.md");
        assert!(info.exists);
        assert!(info.has_installation);
        assert!(info.has_usage);
        assert!(info.has_contributing);
        assert!(!info.has_license);
    }

    #[test]
    fn readme_length_counts_characters() {
        let info = ReadmeInfo::from_content("héllo");
        assert_eq!(info.length, 5);
    }

    #[test]
    fn api_repository_flattens_license_name() {
        let json = r#"{
            "id": 7, "name": "tool", "full_name": "me/tool", "description": null,
            "html_url": "https://github.com/me/tool", "homepage": "",
            "fork": false, "stargazers_count": 3, "forks_count": 1, "watchers_count": 3,
            "language": "Rust", "license": {"key": "mit", "name": "MIT License"},
            "size": 120, "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-02-01T00:00:00Z", "pushed_at": null
        }"#;
        let api: ApiRepository = serde_json::from_str(json).unwrap();
        let repo = Repository::from(api);
        assert_eq!(repo.license.as_deref(), Some("MIT License"));
        assert!(repo.topics.is_empty());
        assert!(!repo.has_homepage());
        assert_eq!(repo.stars, 3);
    }

    #[test]
    fn unknown_entry_kinds_deserialize() {
        let entry: ContentEntry =
            serde_json::from_str(r#"{"name": "x", "type": "weird", "path": "x", "size": 0}"#).unwrap();
        assert_eq!(entry.kind, EntryKind::Other);
    }
}
