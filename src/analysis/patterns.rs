use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

use crate::analysis::scorers::mean;
use crate::models::{
    ActivityTrend, Commit, CommitPatterns, DayCount, LanguageAnalysis, LanguageShare, Repository,
    WeeklyCount,
};

pub const TRAILING_WEEKS: i64 = 12;
pub const TOP_LANGUAGES: usize = 8;

const DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Weekly, day-of-week and trend analytics over the commit sample.
///
/// Bucket `i` (11 down to 0) starts at midnight UTC `7 * i` days before
/// `now` and spans seven days, so the newest bucket reaches past `now`.
pub fn analyze_commit_patterns(commits: &[Commit], now: DateTime<Utc>) -> CommitPatterns {
    if commits.is_empty() {
        return CommitPatterns::no_data();
    }

    let weekly_data: Vec<WeeklyCount> = (0..TRAILING_WEEKS)
        .rev()
        .map(|i| {
            let week_start = (now - Duration::days(7 * i))
                .date_naive()
                .and_time(NaiveTime::MIN)
                .and_utc();
            let week_end = week_start + Duration::days(7);
            let count = commits
                .iter()
                .filter_map(|c| c.date)
                .filter(|d| *d >= week_start && *d < week_end)
                .count();
            WeeklyCount { week: week_start.date_naive(), commits: count as u32 }
        })
        .collect();

    let mut by_day = [0u32; 7];
    for date in commits.iter().filter_map(|c| c.date) {
        by_day[date.weekday().num_days_from_sunday() as usize] += 1;
    }
    let day_of_week_distribution: Vec<DayCount> = DAYS
        .iter()
        .zip(by_day)
        .map(|(day, count)| DayCount { day: day.to_string(), count })
        .collect();
    let most_active_day = day_of_week_distribution
        .iter()
        .reduce(|best, d| if d.count > best.count { d } else { best })
        .map(|d| d.day.clone());

    let counts: Vec<f64> = weekly_data.iter().map(|w| w.commits as f64).collect();
    let half = counts.len() / 2;
    let first_half: f64 = counts[..half].iter().sum();
    let second_half: f64 = counts[half..].iter().sum();
    let activity_trend = if second_half > first_half * 1.3 {
        ActivityTrend::Increasing
    } else if second_half < first_half * 0.7 {
        ActivityTrend::Decreasing
    } else {
        ActivityTrend::Stable
    };

    CommitPatterns {
        total_commits: commits.len() as u32,
        average_per_week: (mean(&counts) * 10.0).round() / 10.0,
        most_active_day,
        activity_trend,
        weekly_data,
        day_of_week_distribution,
    }
}

/// Share of repositories per primary language, top eight by count.
///
/// Equal counts rank by first appearance in `repositories` (most recently
/// updated first), so the newest language wins a tie for primary.
pub fn analyze_languages(
    languages: &BTreeMap<String, u32>,
    repositories: &[Repository],
) -> LanguageAnalysis {
    if languages.is_empty() {
        return LanguageAnalysis {
            total_languages: 0,
            primary_language: None,
            distribution: Vec::new(),
            diversity_score: 0,
        };
    }

    let first_seen = |name: &str| {
        repositories
            .iter()
            .position(|r| r.language.as_deref() == Some(name))
            .unwrap_or(usize::MAX)
    };

    let total: u32 = languages.values().sum();
    let mut ranked: Vec<(usize, LanguageShare)> = languages
        .iter()
        .map(|(name, &count)| {
            let share = LanguageShare {
                name: name.clone(),
                count,
                percentage: if total == 0 {
                    0
                } else {
                    (count as f64 / total as f64 * 100.0).round() as u32
                },
            };
            (first_seen(name), share)
        })
        .collect();
    ranked.sort_by(|(a_seen, a), (b_seen, b)| b.count.cmp(&a.count).then(a_seen.cmp(b_seen)));

    let mut distribution: Vec<LanguageShare> = ranked.into_iter().map(|(_, share)| share).collect();
    let primary_language = distribution.first().map(|l| l.name.clone());
    distribution.truncate(TOP_LANGUAGES);

    LanguageAnalysis {
        total_languages: languages.len(),
        primary_language,
        distribution,
        diversity_score: (languages.len() * 10).min(100) as u8,
    }
}
