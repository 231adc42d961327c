use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// GitHub access token. `GITHUB_TOKEN` in the environment wins over this.
    pub token: Option<String>,

    /// Which saved list `browse` commits into.
    #[serde(default = "default_list_key")]
    pub list_key: String,

    #[serde(default)]
    pub directory: DirectoryConfig,

    #[serde(default)]
    pub browse: BrowseConfig,
}

fn default_list_key() -> String {
    "candidates".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::new(),
            config_path: PathBuf::new(),
            token: None,
            list_key: default_list_key(),
            directory: DirectoryConfig::default(),
            browse: BrowseConfig::default(),
        }
    }
}

// ── Directory transport ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Base URL of the directory API (default: https://api.github.com)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Fixed pause before every upstream request, shared-quota throttle
    /// (default: 1000)
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.github.com".into()
}

fn default_throttle_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            throttle_ms: default_throttle_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ── Browse session policy ────────────────────────────────────────
//
// These are uncoordinated policy constants, kept named and overridable
// rather than derived from each other.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// Stub entries fetched per batch (default: 50)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// How many entries of a fresh batch `start` probes (default: 10)
    #[serde(default = "default_probe_window")]
    pub probe_window: usize,
    /// Consecutive non-suitable probes tolerated before the session fails
    /// (default: 20)
    #[serde(default = "default_skip_bound")]
    pub skip_bound: u32,
    /// Deadline on the whole `start` procedure, in seconds (default: 15)
    #[serde(default = "default_start_timeout_secs")]
    pub start_timeout_secs: u64,
    /// Profile fields (of name/location/email/company/bio) required for a
    /// candidate to count as suitable (default: 2)
    #[serde(default = "default_min_profile_fields")]
    pub min_profile_fields: usize,
    /// Exclusive upper bound of the sampled identifier space
    /// (default: 100_000_000)
    #[serde(default = "default_max_user_id")]
    pub max_user_id: u64,
}

fn default_page_size() -> u32 {
    50
}

fn default_probe_window() -> usize {
    10
}

fn default_skip_bound() -> u32 {
    20
}

fn default_start_timeout_secs() -> u64 {
    15
}

fn default_min_profile_fields() -> usize {
    2
}

fn default_max_user_id() -> u64 {
    100_000_000
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            probe_window: default_probe_window(),
            skip_bound: default_skip_bound(),
            start_timeout_secs: default_start_timeout_secs(),
            min_profile_fields: default_min_profile_fields(),
            max_user_id: default_max_user_id(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let octoscout_dir = home.join(".octoscout");
        let config_path = octoscout_dir.join("config.toml");

        if !octoscout_dir.exists() {
            fs::create_dir_all(&octoscout_dir).context("Failed to create .octoscout directory")?;
        }

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            // Set computed paths that are skipped during serialization
            config.config_path.clone_from(&config_path);
            config.workspace_dir = octoscout_dir;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self {
                config_path: config_path.clone(),
                workspace_dir: octoscout_dir,
                ..Self::default()
            };
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.browse.page_size == 0 {
            return Err(ConfigError::Validation("browse.page_size must be > 0".into()));
        }
        if self.browse.probe_window == 0 {
            return Err(ConfigError::Validation(
                "browse.probe_window must be > 0".into(),
            ));
        }
        if self.browse.max_user_id < 2 {
            return Err(ConfigError::Validation(
                "browse.max_user_id must leave a sampling window".into(),
            ));
        }
        if self.list_key.is_empty() {
            return Err(ConfigError::Validation("list_key must not be empty".into()));
        }
        Ok(())
    }

    /// Resolve the directory token: environment first, config file second.
    pub fn resolve_token(&self) -> Result<String, ConfigError> {
        if let Ok(token) = std::env::var("GITHUB_TOKEN")
            && !token.is_empty()
        {
            return Ok(token);
        }
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| ConfigError::MissingToken {
                config_path: self.config_path.display().to_string(),
            })
    }

    /// Path of the saved-list database under the workspace directory.
    pub fn saved_db_path(&self) -> PathBuf {
        self.workspace_dir.join("saved.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    // ── Defaults ─────────────────────────────────────────────

    #[test]
    fn config_default_has_sane_values() {
        let c = Config::default();
        assert!(c.token.is_none());
        assert_eq!(c.list_key, "candidates");
        assert_eq!(c.directory.base_url, "https://api.github.com");
        assert_eq!(c.directory.throttle_ms, 1000);
        assert_eq!(c.browse.page_size, 50);
        assert_eq!(c.browse.probe_window, 10);
        assert_eq!(c.browse.skip_bound, 20);
        assert_eq!(c.browse.start_timeout_secs, 15);
        assert_eq!(c.browse.min_profile_fields, 2);
        assert_eq!(c.browse.max_user_id, 100_000_000);
    }

    #[test]
    fn empty_toml_parses_to_defaults() {
        let c: Config = toml::from_str("").unwrap();
        assert_eq!(c.browse.skip_bound, 20);
        assert_eq!(c.directory.throttle_ms, 1000);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let c: Config = toml::from_str(
            r#"
            token = "ghp_example"

            [browse]
            skip_bound = 5
            "#,
        )
        .unwrap();
        assert_eq!(c.browse.skip_bound, 5);
        assert_eq!(c.browse.page_size, 50);
        assert_eq!(c.token.as_deref(), Some("ghp_example"));
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let mut c = Config::default();
        c.browse.page_size = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_list_key() {
        let mut c = Config::default();
        c.list_key = String::new();
        assert!(c.validate().is_err());
    }

    // ── Token resolution ─────────────────────────────────────

    #[test]
    fn token_env_wins_over_config() {
        let _guard = env_lock();
        // SAFETY: serialized by ENV_LOCK; tests in this module never race.
        unsafe { std::env::set_var("GITHUB_TOKEN", "ghp_from_env") };
        let c = Config {
            token: Some("ghp_from_file".into()),
            ..Config::default()
        };
        assert_eq!(c.resolve_token().unwrap(), "ghp_from_env");
        unsafe { std::env::remove_var("GITHUB_TOKEN") };
    }

    #[test]
    fn token_falls_back_to_config_file() {
        let _guard = env_lock();
        unsafe { std::env::remove_var("GITHUB_TOKEN") };
        let c = Config {
            token: Some("  ghp_from_file  ".into()),
            ..Config::default()
        };
        assert_eq!(c.resolve_token().unwrap(), "ghp_from_file");
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let _guard = env_lock();
        unsafe { std::env::remove_var("GITHUB_TOKEN") };
        let c = Config::default();
        let err = c.resolve_token().unwrap_err();
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }
}
