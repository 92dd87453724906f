//! The six dimension scorers.
//!
//! Every scorer is a total function returning 0-100. Each score is a sum of
//! independently capped sub-scores, and an empty input scores exactly 0.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Months, Utc};

use crate::models::{count_since, Commit, DimensionScores, RepoDetail, Repository, UserData};
use crate::taxonomy::layout;

pub fn score_dimensions(data: &UserData, now: DateTime<Utc>) -> DimensionScores {
    DimensionScores {
        documentation: documentation_score(&data.repo_details),
        structure: structure_score(&data.repo_details),
        activity: activity_score(&data.commits, &data.repositories, now),
        organization: organization_score(&data.repositories),
        impact: impact_score(&data.repositories),
        technical: technical_score(&data.repositories, &data.languages),
    }
}

pub fn documentation_score(details: &[RepoDetail]) -> u8 {
    if details.is_empty() {
        return 0;
    }

    let scores: Vec<f64> = details
        .iter()
        .map(|d| documentation_points(d) as f64)
        .collect();

    mean(&scores).round() as u8
}

fn documentation_points(detail: &RepoDetail) -> u32 {
    let readme = &detail.readme;
    let mut score = 0;

    if readme.exists {
        score += 40;
        score += match readme.length {
            l if l > 2000 => 40,
            l if l > 1000 => 30,
            l if l > 500 => 20,
            l if l > 200 => 10,
            _ => 0,
        };
        if readme.has_installation {
            score += 5;
        }
        if readme.has_usage {
            score += 5;
        }
    }

    if detail.contents.iter().any(|c| layout().is_docs_dir(c)) {
        score += 10;
    }

    if readme.has_contributing {
        score += 10;
    }

    score.min(100)
}

pub fn structure_score(details: &[RepoDetail]) -> u8 {
    if details.is_empty() {
        return 0;
    }

    let scores: Vec<f64> = details
        .iter()
        .map(|d| structure_points(d) as f64)
        .collect();

    mean(&scores).round() as u8
}

fn structure_points(detail: &RepoDetail) -> u32 {
    let taxonomy = layout();
    let mut score = 0;

    if detail.lowercase_names().any(|n| n == ".gitignore") {
        score += 25;
    }
    if detail.contents.iter().any(|c| taxonomy.is_dependency_manifest(&c.name)) {
        score += 25;
    }
    if detail.contents.iter().any(|c| taxonomy.is_conventional_dir(c)) {
        score += 25;
    }
    if detail.contents.iter().any(|c| taxonomy.is_ci_signal(c)) {
        score += 25;
    }

    score.min(100)
}

/// Commit recency, weekly frequency and week-to-week consistency over the
/// trailing six months.
pub fn activity_score(commits: &[Commit], repos: &[Repository], now: DateTime<Utc>) -> u8 {
    if commits.is_empty() && repos.is_empty() {
        return 0;
    }

    let six_months_ago = now
        .checked_sub_months(Months::new(6))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let weekly: Vec<f64> = coarse_weekly_counts(commits, six_months_ago)
        .into_values()
        .map(|c| c as f64)
        .collect();

    let last_30_days = count_since(commits, now - Duration::days(30));
    let recency = match last_30_days {
        n if n > 20 => 30,
        n if n > 10 => 25,
        n if n > 5 => 20,
        n if n > 0 => 10,
        _ => 0,
    };

    let avg_weekly = mean(&weekly);
    let frequency = match avg_weekly {
        a if a >= 10.0 => 40,
        a if a >= 5.0 => 30,
        a if a >= 2.0 => 20,
        a if a >= 1.0 => 10,
        _ => 0,
    };

    let consistency = match weekly.len() {
        0 => 0,
        1 => 15,
        _ => {
            let ratio = (1.0 - std_dev(&weekly) / (avg_weekly + 1.0)).max(0.0);
            (ratio * 30.0).round() as u32
        }
    };

    (recency + frequency + consistency).min(100) as u8
}

/// Buckets commits by year and `ceil(day_of_month / 7)`. The key ignores the
/// month, so the same week-of-month in different months shares a bucket.
fn coarse_weekly_counts(commits: &[Commit], since: DateTime<Utc>) -> BTreeMap<String, u32> {
    let mut weekly = BTreeMap::new();
    for date in commits.iter().filter_map(|c| c.date).filter(|d| *d >= since) {
        let key = format!("{}-W{}", date.year(), date.day().div_ceil(7));
        *weekly.entry(key).or_insert(0) += 1;
    }
    weekly
}

pub fn organization_score(repos: &[Repository]) -> u8 {
    if repos.is_empty() {
        return 0;
    }

    let total = repos.len() as f64;
    let share = |predicate: &dyn Fn(&Repository) -> bool| -> u32 {
        let matching = repos.iter().filter(|r| predicate(r)).count() as f64;
        (matching / total * 25.0).round() as u32
    };

    let score = share(&|r| !r.fork)
        + share(&|r| r.description.as_deref().is_some_and(|d| d.chars().count() > 20))
        + share(&|r| !r.topics.is_empty())
        + share(&|r| r.license.is_some());

    score.min(100) as u8
}

/// Stars and forks on a log10 scale so a single breakout repository cannot
/// carry the whole dimension.
pub fn impact_score(repos: &[Repository]) -> u8 {
    if repos.is_empty() {
        return 0;
    }

    let total_stars: u64 = repos.iter().map(|r| r.stars as u64).sum();
    let total_forks: u64 = repos.iter().map(|r| r.forks as u64).sum();

    let star_points = ((total_stars as f64 + 1.0).log10() * 13.0).min(40.0).round() as u32;
    let fork_points = ((total_forks as f64 + 1.0).log10() * 15.0).min(30.0).round() as u32;
    let homepage_points = if repos.iter().any(|r| r.has_homepage()) { 30 } else { 0 };

    (star_points + fork_points + homepage_points).min(100) as u8
}

pub fn technical_score(repos: &[Repository], languages: &BTreeMap<String, u32>) -> u8 {
    if repos.is_empty() {
        return 0;
    }

    let diversity = match languages.len() {
        n if n >= 6 => 60,
        n if n >= 4 => 45,
        n if n >= 3 => 35,
        n if n >= 2 => 25,
        _ => 15,
    };

    let avg_size = repos.iter().map(|r| r.size as f64).sum::<f64>() / repos.len() as f64;
    let complexity = match avg_size {
        s if s > 5000.0 => 40,
        s if s > 2000.0 => 30,
        s if s > 1000.0 => 20,
        s if s > 500.0 => 10,
        _ => 0,
    };

    (diversity + complexity).min(100) as u8
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let squares: Vec<f64> = values.iter().map(|v| (v - avg).powi(2)).collect();
    mean(&squares).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::*;
    use crate::models::ContentEntry;
    use proptest::prelude::*;

    #[test]
    fn empty_inputs_score_zero() {
        let now = fixed_now();
        assert_eq!(documentation_score(&[]), 0);
        assert_eq!(structure_score(&[]), 0);
        assert_eq!(activity_score(&[], &[], now), 0);
        assert_eq!(organization_score(&[]), 0);
        assert_eq!(impact_score(&[]), 0);
        assert_eq!(technical_score(&[], &BTreeMap::new()), 0);
    }

    #[test]
    fn well_kept_repositories_max_out_documentation_and_structure() {
        let details: Vec<_> = (0..10).map(|i| well_kept_detail(&format!("repo{}", i))).collect();
        assert_eq!(documentation_score(&details), 100);
        assert_eq!(structure_score(&details), 100);
    }

    #[test]
    fn install_and_usage_alone_stop_at_ninety() {
        let d = detail(repo("a"), readme(2500, true, true), vec![]);
        assert_eq!(documentation_score(&[d]), 90);
    }

    #[test]
    fn documentation_ladder() {
        let short = detail(repo("a"), readme(150, false, false), vec![]);
        let medium = detail(repo("b"), readme(800, true, false), vec![]);
        let docs_only = detail(repo("c"), Default::default(), vec![ContentEntry::dir("Docs")]);

        assert_eq!(documentation_score(&[short.clone()]), 40);
        assert_eq!(documentation_score(&[medium]), 65);
        assert_eq!(documentation_score(&[docs_only]), 10);
        // (40 + 10) / 2
        let missing = detail(repo("d"), Default::default(), vec![ContentEntry::dir("docs")]);
        assert_eq!(documentation_score(&[short, missing]), 25);
    }

    #[test]
    fn contributing_section_adds_ten() {
        let mut info = readme(2500, true, true);
        info.has_contributing = true;
        let d = detail(repo("a"), info, vec![ContentEntry::dir("docs")]);
        assert_eq!(documentation_score(&[d]), 100);
    }

    #[test]
    fn structure_counts_each_signal_once() {
        let partial = detail(
            repo("a"),
            Default::default(),
            vec![ContentEntry::file(".gitignore"), ContentEntry::file("package.json")],
        );
        let bare = detail(repo("b"), Default::default(), vec![ContentEntry::file("main.c")]);
        assert_eq!(structure_score(&[partial.clone()]), 50);
        assert_eq!(structure_score(&[partial, bare]), 25);
    }

    #[test]
    fn single_active_week_earns_flat_consistency_bonus() {
        let now = fixed_now();
        // June 15-17 all fall in week-of-month 3.
        let commits = commits_days_ago(now, &[5, 4, 3]);
        // recency 10 + frequency 20 (3/week) + single-week bonus 15
        assert_eq!(activity_score(&commits, &[], now), 45);
    }

    #[test]
    fn even_weeks_earn_full_consistency() {
        let now = fixed_now();
        // Two commits on June 16 (W3) and two on June 9 (W2).
        let commits = commits_days_ago(now, &[4, 4, 11, 11]);
        // recency 10 + frequency 20 (2/week) + consistency 30
        assert_eq!(activity_score(&commits, &[], now), 60);
    }

    #[test]
    fn stale_commits_only_count_nothing() {
        let now = fixed_now();
        let commits = commits_days_ago(now, &[400, 500]);
        assert_eq!(activity_score(&commits, &[repo("a")], now), 0);
    }


    #[test]
    fn organization_quarters() {
        let mut documented = repo("a");
        documented.description = Some("A parser for a configuration language".into());
        documented.topics = vec!["parser".into()];
        documented.license = Some("MIT License".into());

        let mut fork = repo("b");
        fork.fork = true;
        fork.description = Some("too short".into());

        assert_eq!(organization_score(&[documented.clone()]), 100);
        // non-fork 13 (12.5 rounds up) + description 13 + topics 13 + license 13
        assert_eq!(organization_score(&[documented, fork]), 52);
    }

    #[test]
    fn impact_uses_log_scale() {
        let repos = vec![starred("a", 90, 15), starred("b", 9, 5)];
        // round(log10(100) * 13) + round(log10(21) * 15) = 26 + 20
        assert_eq!(impact_score(&repos), 46);
    }

    #[test]
    fn homepage_adds_flat_bonus() {
        let mut with_site = starred("a", 0, 0);
        with_site.homepage = Some("https://example.dev".into());
        let mut blank_site = starred("b", 0, 0);
        blank_site.homepage = Some(String::new());
        assert_eq!(impact_score(&[with_site]), 30);
        assert_eq!(impact_score(&[blank_site]), 0);
    }

    #[test]
    fn huge_impact_is_capped() {
        let mut r = starred("a", 5_000_000, 1_000_000);
        r.homepage = Some("https://example.dev".into());
        assert_eq!(impact_score(&[r]), 100);
    }

    #[test]
    fn technical_combines_language_and_size_ladders() {
        let mut big = repo("a");
        big.size = 6000;
        let languages: BTreeMap<String, u32> =
            ["Rust", "Go", "C"].iter().map(|l| (l.to_string(), 1)).collect();
        assert_eq!(technical_score(&[big], &languages), 75);
        assert_eq!(technical_score(&[repo("b")], &BTreeMap::new()), 15);
    }

    #[test]
    fn readme_length_ladder_is_strict() {
        let cases = [
            (2001, 80),
            (2000, 70),
            (1001, 70),
            (1000, 60),
            (501, 60),
            (500, 50),
            (201, 50),
            (200, 40),
        ];
        for (length, expected) in cases {
            let d = detail(repo("a"), readme(length, false, false), vec![]);
            assert_eq!(documentation_score(&[d]), expected, "length {}", length);
        }
    }

    #[test]
    fn recency_ladder_edges() {
        let now = fixed_now();
        // All commits land yesterday in one coarse week, so consistency is the
        // flat 15 and frequency equals the commit count.
        let cases = [
            (5, 10 + 30),
            (6, 20 + 30),
            (10, 20 + 40),
            (11, 25 + 40),
            (20, 25 + 40),
            (21, 30 + 40),
        ];
        for (count, expected) in cases {
            let commits = commits_days_ago(now, &vec![1; count]);
            assert_eq!(activity_score(&commits, &[], now), expected + 15, "{} commits", count);
        }
    }

    #[test]
    fn frequency_ladder_edges() {
        let now = fixed_now();
        // Sixty days back: outside the recency window, inside six months.
        let cases = [(1, 10), (2, 20), (4, 20), (5, 30), (9, 30), (10, 40)];
        for (count, expected) in cases {
            let commits = commits_days_ago(now, &vec![60; count]);
            assert_eq!(activity_score(&commits, &[], now), expected + 15, "{} commits", count);
        }
    }

    #[test]
    fn frequency_below_two_per_week() {
        let now = fixed_now();
        // April 21 (W3) once, April 10-11 (W2) twice: mean 1.5, stddev 0.5.
        let commits = commits_days_ago(now, &[60, 70, 71]);
        // frequency 10 + consistency round(30 * (1 - 0.5 / 2.5))
        assert_eq!(activity_score(&commits, &[], now), 10 + 24);
    }

    #[test]
    fn description_must_exceed_twenty_characters() {
        let mut exact = repo("a");
        exact.description = Some("x".repeat(20));
        let mut longer = repo("b");
        longer.description = Some("x".repeat(21));

        assert_eq!(organization_score(&[exact]), 25);
        assert_eq!(organization_score(&[longer]), 50);
    }

    #[test]
    fn std_dev_is_population() {
        assert_eq!(std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0);
        assert_eq!(std_dev(&[]), 0.0);
    }

    fn arb_repo() -> impl Strategy<Value = Repository> {
        (
            any::<bool>(),
            0u32..2_000_000,
            0u32..500_000,
            0u64..50_000,
            proptest::option::of("[a-z ]{0,40}"),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(fork, stars, forks, size, description, topics, license)| Repository {
                fork,
                stars,
                forks,
                size,
                description,
                topics: if topics { vec!["cli".into()] } else { vec![] },
                license: license.then(|| "MIT License".to_string()),
                homepage: (stars % 2 == 0).then(|| "https://x.dev".to_string()),
                ..repo("r")
            })
    }

    proptest! {
        #[test]
        fn repository_scores_stay_in_range(repos in proptest::collection::vec(arb_repo(), 0..40)) {
            let languages = crate::models::aggregate_languages(&repos);
            prop_assert!(organization_score(&repos) <= 100);
            prop_assert!(impact_score(&repos) <= 100);
            prop_assert!(technical_score(&repos, &languages) <= 100);
        }

        #[test]
        fn activity_stays_in_range(days in proptest::collection::vec(0i64..400, 0..300)) {
            let now = fixed_now();
            let commits = commits_days_ago(now, &days);
            prop_assert!(activity_score(&commits, &[], now) <= 100);
        }
    }
}
