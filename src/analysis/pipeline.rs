use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::analysis::insights::{
    generate_recommendations, generate_red_flags, generate_strengths, InsightContext,
};
use crate::analysis::patterns::{analyze_commit_patterns, analyze_languages};
use crate::analysis::rating_engine::RatingEngine;
use crate::analysis::repository::generate_repository_insights;
use crate::error::Result;
use crate::github::ProfileSource;
use crate::models::{AnalysisResult, PortfolioStats, ProfileReport, ScoreResult, UserData};
use crate::storage::{analysis_cache_key, AnalysisCache};
use crate::validate::validate_account_input;

/// Dimension scores, overall score and rating for one snapshot.
pub fn compute_scores(data: &UserData, now: DateTime<Utc>) -> ScoreResult {
    RatingEngine::new().score(data, now)
}

/// Assembles every qualitative output of the engine into one value.
///
/// Total over well-formed input: empty collections produce empty lists and
/// the no-data sentinels, never an error.
pub fn compute_analysis(scores: &ScoreResult, data: &UserData, now: DateTime<Utc>) -> AnalysisResult {
    let ctx = InsightContext::new(&scores.dimensions, data, now);

    AnalysisResult {
        strengths: generate_strengths(&ctx),
        red_flags: generate_red_flags(&ctx),
        recommendations: generate_recommendations(&ctx),
        commit_patterns: analyze_commit_patterns(&data.commits, now),
        language_analysis: analyze_languages(&data.languages, &data.repositories),
        repository_insights: generate_repository_insights(&data.repo_details),
        generated_at: now,
    }
}

pub fn portfolio_stats(data: &UserData) -> PortfolioStats {
    PortfolioStats {
        total_repos: data.repositories.len(),
        original_repos: data.original_repo_count(),
        total_stars: data.total_stars(),
        total_forks: data.total_forks(),
        languages: data.languages.len(),
    }
}

/// A report and whether it was served from the cache.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: ProfileReport,
    pub cached: bool,
}

/// Serving flow: validate, consult the cache, fetch, score, cache.
pub struct AnalysisPipeline<S> {
    source: S,
    rating_engine: RatingEngine,
    cache: AnalysisCache<ProfileReport>,
}

impl<S: ProfileSource> AnalysisPipeline<S> {
    pub fn new(source: S, cache_ttl: Duration) -> Self {
        Self::with_cache(source, AnalysisCache::new(cache_ttl))
    }

    pub fn with_cache(source: S, cache: AnalysisCache<ProfileReport>) -> Self {
        Self {
            source,
            rating_engine: RatingEngine::new(),
            cache,
        }
    }

    pub fn cache(&self) -> &AnalysisCache<ProfileReport> {
        &self.cache
    }

    pub async fn analyze(&self, input: &str) -> Result<AnalysisOutcome> {
        let username = validate_account_input(input)?;
        let key = analysis_cache_key(&username);

        if let Some(report) = self.cache.get(&key) {
            tracing::info!("Serving cached analysis for {}", username);
            return Ok(AnalysisOutcome { report, cached: true });
        }

        tracing::info!("Starting analysis for GitHub user: {}", username);
        let started = Instant::now();

        let data = self.source.fetch_user_data(&username).await?;
        let now = Utc::now();
        let scores = self.rating_engine.score(&data, now);
        let analysis = compute_analysis(&scores, &data, now);

        let report = ProfileReport {
            stats: portfolio_stats(&data),
            profile: data.profile,
            scores,
            analysis,
            analyzed_at: now,
            analysis_duration_ms: started.elapsed().as_millis() as u64,
        };

        tracing::info!(
            "Analysis complete for {}: {}/100 ({}) in {}ms",
            username,
            report.scores.overall,
            report.scores.rating.label,
            report.analysis_duration_ms
        );

        self.cache.set(&key, report.clone());
        Ok(AnalysisOutcome { report, cached: false })
    }

    /// Previously computed report for `username`, if it is still fresh.
    pub fn cached_report(&self, username: &str) -> Option<ProfileReport> {
        self.cache.get(&analysis_cache_key(username.trim()))
    }
}
