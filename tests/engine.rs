use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;

use gitsoar::analysis::{compute_analysis, compute_scores};
use gitsoar::models::{
    aggregate_languages, Commit, ContentEntry, ImpactLevel, Priority, Profile, ReadmeInfo,
    RatingTier, RepoDetail, Repository, UserData,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 20, 12, 0, 0).unwrap()
}

fn repo(name: &str) -> Repository {
    Repository {
        name: name.to_string(),
        full_name: format!("octo/{}", name),
        url: format!("https://github.com/octo/{}", name),
        language: Some("Rust".to_string()),
        ..Default::default()
    }
}

fn documented(repo: Repository) -> RepoDetail {
    let readme = format!("# {}\n## Installation\n## Usage\n## Contributing\n{}", repo.name, "x".repeat(2500));
    RepoDetail {
        repo,
        readme: ReadmeInfo::from_content(&readme),
        languages: BTreeMap::from([("Rust".to_string(), 10_000)]),
        contents: vec![
            ContentEntry::file(".gitignore"),
            ContentEntry::file("Cargo.toml"),
            ContentEntry::dir("src"),
            ContentEntry::dir(".github"),
        ],
    }
}

#[test]
fn well_documented_portfolio_maxes_documentation_and_structure() {
    let repositories: Vec<Repository> = (0..10).map(|i| repo(&format!("tool-{}", i))).collect();
    let data = UserData {
        profile: Profile { username: "octo".into(), ..Default::default() },
        repo_details: repositories.iter().cloned().map(documented).collect(),
        languages: aggregate_languages(&repositories),
        repositories,
        ..Default::default()
    };

    let scores = compute_scores(&data, now());
    assert_eq!(scores.dimensions.documentation, 100);
    assert_eq!(scores.dimensions.structure, 100);

    let analysis = compute_analysis(&scores, &data, now());
    let titles: Vec<&str> = analysis.strengths.iter().map(|s| s.title.as_str()).collect();
    assert!(titles.contains(&"Excellent Documentation"), "{:?}", titles);
    assert_eq!(analysis.repository_insights.len(), 10);
    assert_eq!(analysis.language_analysis.primary_language.as_deref(), Some("Rust"));
    assert_eq!(analysis.language_analysis.distribution[0].percentage, 100);
}

#[test]
fn empty_account_scores_zero_everywhere() {
    let data = UserData::default();
    let scores = compute_scores(&data, now());

    assert!(scores.dimensions.iter().all(|(_, score)| score == 0));
    assert_eq!(scores.overall, 0);
    assert_eq!(scores.rating.tier, RatingTier::Critical);
    assert_eq!(scores.rating.label, "Critical");

    let analysis = compute_analysis(&scores, &data, now());
    assert!(analysis.strengths.is_empty());
    assert_eq!(analysis.commit_patterns.total_commits, 0);
    assert!(analysis.commit_patterns.weekly_data.is_empty());
    assert_eq!(analysis.language_analysis.total_languages, 0);
}

#[test]
fn recommendations_sorted_by_priority() {
    let data = UserData {
        repositories: vec![repo("bare")],
        commits: vec![Commit::at(now() - Duration::days(400))],
        ..Default::default()
    };
    let scores = compute_scores(&data, now());
    let analysis = compute_analysis(&scores, &data, now());

    let priorities: Vec<Priority> = analysis.recommendations.iter().map(|r| r.priority).collect();
    let mut sorted = priorities.clone();
    sorted.sort();
    assert_eq!(priorities, sorted);
    assert!(!priorities.is_empty());
    assert!(analysis
        .recommendations
        .iter()
        .all(|r| matches!(r.impact, ImpactLevel::High | ImpactLevel::Medium | ImpactLevel::Low)));
}

#[test]
fn report_json_uses_wire_spellings() {
    let data = UserData::default();
    let scores = compute_scores(&data, now());
    let analysis = compute_analysis(&scores, &data, now());

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["commit_patterns"]["activity_trend"], "no-data");
    let severities: Vec<&str> = json["red_flags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["severity"].as_str().unwrap())
        .collect();
    assert!(severities.iter().all(|s| s.chars().all(|c| c.is_ascii_lowercase())));
    assert!(json["red_flags"][0]["title"].is_string());

    let scores_json = serde_json::to_value(&scores).unwrap();
    assert_eq!(scores_json["overall"], 0);
    assert_eq!(scores_json["rating"]["color"], "#DC2626");
}
