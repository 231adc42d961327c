use chrono::{DateTime, Utc};
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `octoscout`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains. Session-level failures
/// (skip-bound, timeout) are terminal *statuses* on the browse session, not
/// errors — they never unwind through this type.
#[derive(Debug, Error)]
pub enum ScoutError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Directory API ────────────────────────────────────────────────────
    #[error("directory: {0}")]
    Directory(#[from] DirectoryError),

    // ── Saved-list store ─────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(
        "GitHub access token is missing. Set GITHUB_TOKEN or add `token` to {config_path}"
    )]
    MissingToken { config_path: String },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Directory API errors ───────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory request failed: {message}")]
    Request { message: String },

    #[error("rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("directory authentication failed: {message}")]
    Auth { message: String },

    #[error("malformed directory response: {0}")]
    Decode(String),
}

impl DirectoryError {
    /// Rate limiting affects the whole session, never just one entity.
    pub const fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

// ─── Saved-list store errors ────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("position {position} out of bounds for list {list_key}")]
    OutOfBounds { list_key: String, position: usize },

    #[error("sqlx: {0}")]
    Sqlx(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Sqlx(err.to_string())
    }
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = ScoutError::Config(ConfigError::Validation("page_size must be > 0".into()));
        assert!(err.to_string().contains("validation failed"));
    }

    #[test]
    fn missing_token_names_remediation() {
        let err = ConfigError::MissingToken {
            config_path: "/home/u/.octoscout/config.toml".into(),
        };
        assert!(err.to_string().contains("GITHUB_TOKEN"));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn rate_limited_displays_reset() {
        let reset_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let err = ScoutError::Directory(DirectoryError::RateLimited { reset_at });
        assert!(err.to_string().contains("rate limit exceeded"));
        assert!(DirectoryError::RateLimited { reset_at }.is_rate_limit());
    }

    #[test]
    fn request_error_is_not_rate_limit() {
        let err = DirectoryError::Request {
            message: "connection reset".into(),
        };
        assert!(!err.is_rate_limit());
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let scout_err: ScoutError = anyhow_err.into();
        assert!(scout_err.to_string().contains("something went wrong"));
    }
}
