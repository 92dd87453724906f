pub mod cache;

pub use cache::{analysis_cache_key, AnalysisCache, CacheStats};
