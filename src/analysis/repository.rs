use crate::analysis::insights::POPULAR_REPO_STARS;
use crate::models::{Badge, BadgeKind, RepoDetail, RepositoryInsight};

/// Badges and a standalone 0-100 score for each detailed repository,
/// most starred first.
pub fn generate_repository_insights(details: &[RepoDetail]) -> Vec<RepositoryInsight> {
    let mut insights: Vec<RepositoryInsight> = details.iter().map(repository_insight).collect();
    insights.sort_by(|a, b| b.stars.cmp(&a.stars));
    insights
}

fn repository_insight(detail: &RepoDetail) -> RepositoryInsight {
    let repo = &detail.repo;

    RepositoryInsight {
        name: repo.name.clone(),
        url: repo.url.clone(),
        stars: repo.stars,
        forks: repo.forks,
        language: repo.language.clone(),
        updated_at: repo.updated_at,
        score: repository_score(detail),
        insights: badges(detail),
    }
}

fn badges(detail: &RepoDetail) -> Vec<Badge> {
    let repo = &detail.repo;
    let mut badges = Vec::new();
    let mut push = |kind, text: String| badges.push(Badge { kind, text });

    if repo.stars >= POPULAR_REPO_STARS {
        push(BadgeKind::Success, "Popular project".to_string());
    }
    if !detail.readme.exists {
        push(BadgeKind::Warning, "Missing README".to_string());
    }
    if repo.fork {
        push(BadgeKind::Info, "Forked repository".to_string());
    }
    if repo.license.is_some() {
        push(BadgeKind::Success, "Has license".to_string());
    }
    if !repo.topics.is_empty() {
        push(BadgeKind::Info, format!("{} topics", repo.topics.len()));
    }

    badges
}

pub fn repository_score(detail: &RepoDetail) -> u8 {
    let repo = &detail.repo;
    let mut score = 0u32;

    if detail.readme.exists {
        score += 40;
    }
    if detail.readme.length > 500 {
        score += 20;
    }
    if repo.license.is_some() {
        score += 15;
    }
    if !repo.topics.is_empty() {
        score += 15;
    }
    if repo.has_description() {
        score += 10;
    }

    score.min(100) as u8
}
