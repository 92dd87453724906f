use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Rate limit exceeded ({remaining} remaining), resets at {}", format_reset(.reset_at))]
    RateLimited {
        reset_at: Option<DateTime<Utc>>,
        limit: Option<u32>,
        remaining: u32,
    },

    #[error("GitHub returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

fn format_reset(reset_at: &Option<DateTime<Utc>>) -> String {
    reset_at
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "an unknown time".to_string())
}

impl Error {
    /// Transient failures worth another attempt. Rate limits are surfaced
    /// to the caller instead, since waiting out the window is their call.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Message shown to the person who asked for the analysis.
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidInput(msg) => msg.clone(),
            Error::UserNotFound(_) => {
                "GitHub profile not found. Please check the username.".to_string()
            }
            Error::RateLimited { reset_at, limit, .. } => {
                let mut msg = "GitHub API rate limit exceeded. Please try again later or add a GitHub token for higher limits.".to_string();
                if let Some(reset_at) = reset_at {
                    msg.push_str(&format!(" Limit resets at {}.", reset_at.to_rfc3339()));
                }
                if let Some(limit) = limit {
                    msg.push_str(&format!(" (limit: {} requests)", limit));
                }
                msg
            }
            Error::Upstream { status: 403, .. } => {
                "Access forbidden. The profile may be private.".to_string()
            }
            Error::Upstream { message, .. } => {
                format!("GitHub API error: {}", message)
            }
            other => other.to_string(),
        }
    }
}
