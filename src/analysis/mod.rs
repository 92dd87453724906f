pub mod insights;
pub mod patterns;
pub mod pipeline;
pub mod rating_engine;
pub mod repository;
pub mod scorers;

#[cfg(test)]
mod fixtures;

pub use insights::{format_count, generate_recommendations, generate_red_flags, generate_strengths, InsightContext};
pub use patterns::{analyze_commit_patterns, analyze_languages};
pub use pipeline::{compute_analysis, compute_scores, AnalysisOutcome, AnalysisPipeline};
pub use rating_engine::{rating_tier, RatingEngine, WEIGHTS};
pub use repository::generate_repository_insights;
pub use scorers::score_dimensions;
