//! # cmt-config
//!
//! Layered configuration loading for commenter using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`COMMENTER_*` prefix, `__` as separator)
//! 2. The configuration file given on the command line (YAML, or TOML by extension)
//! 3. Built-in defaults
//!
//! After extraction an empty `github.token` is filled from `GITHUB_TOKEN`.
//!
//! # Environment Variable Mapping
//!
//! Figment maps `COMMENTER_GITHUB__REPOSITORY` -> `github.repository`,
//! `COMMENTER_GITHUB__RETRIEVAL__FALLBACK_TO_LAST_COMMENT` ->
//! `github.retrieval.fallback_to_last_comment`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use cmt_config::CommenterConfig;
//!
//! let config = CommenterConfig::load_with_dotenv(Path::new("commenter.yaml")).expect("config");
//! config.github.ensure_ready().expect("repository and token");
//! println!("Repository: {}", config.github.repository);
//! ```

mod error;
mod github;
mod milestone;

pub use error::ConfigError;
pub use github::{GithubConfig, RetrievalConfig, TOKEN_ENV_VAR};
pub use milestone::{MilestoneRef, MilestoneSpec};

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml, Yaml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CommenterConfig {
    #[serde(default)]
    pub github: GithubConfig,
}

impl CommenterConfig {
    /// Load configuration from `path` plus environment variables.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] when `path` does not exist and
    /// [`ConfigError::Figment`] when the sources cannot be merged or extracted.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let mut config: Self = Self::figment(path).extract()?;
        config.github.apply_env_token();
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv(path: &Path) -> Result<Self, ConfigError> {
        // A missing .env is normal.
        let _ = dotenvy::dotenv();
        Self::load(path)
    }

    /// Build the figment provider chain for a configuration file.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment(path: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        figment = if is_toml(path) {
            figment.merge(Toml::file(path))
        } else {
            figment.merge(Yaml::file(path))
        };

        figment.merge(Env::prefixed("COMMENTER_").split("__"))
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_not_ready() {
        let config = CommenterConfig::default();
        assert!(config.github.ensure_ready().is_err());
        assert!(config.github.default_labels.is_empty());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = CommenterConfig::load(Path::new("nonexistent.yaml")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration file not found: nonexistent.yaml"
        );
    }

    #[test]
    fn toml_detection_by_extension() {
        assert!(is_toml(Path::new("commenter.toml")));
        assert!(is_toml(Path::new("commenter.TOML")));
        assert!(!is_toml(Path::new("commenter.yaml")));
        assert!(!is_toml(Path::new("commenter")));
    }
}
