use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `/repos/{owner}/{repo}/commits` item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub commit: CommitDetails,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetails {
    pub message: String,
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// A sampled commit. Commits without an authored date still count towards
/// totals but never land in a time bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl Commit {
    pub fn at(date: DateTime<Utc>) -> Self {
        Self { date: Some(date), ..Default::default() }
    }

    pub fn is_since(&self, threshold: DateTime<Utc>) -> bool {
        self.date.is_some_and(|d| d >= threshold)
    }
}

impl From<CommitSummary> for Commit {
    fn from(summary: CommitSummary) -> Self {
        let (author, email, date) = match summary.commit.author {
            Some(a) => (a.name, a.email, a.date),
            None => (None, None, None),
        };
        Self {
            sha: summary.sha,
            message: summary.commit.message,
            author,
            email,
            date,
            url: summary.html_url,
        }
    }
}

/// Number of commits dated at or after `threshold`.
pub fn count_since(commits: &[Commit], threshold: DateTime<Utc>) -> usize {
    commits.iter().filter(|c| c.is_since(threshold)).count()
}
