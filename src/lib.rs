pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod taxonomy;
pub mod analysis;
pub mod storage;
pub mod validate;

pub use config::{Config, FetchConfig};
pub use error::{Error, Result};
pub use github::{GitHubClient, GitHubCollector, ProfileSource};
pub use analysis::{compute_analysis, compute_scores, AnalysisOutcome, AnalysisPipeline};
pub use storage::AnalysisCache;
pub use validate::validate_account_input;
