//! GitHub tracker configuration.

use std::collections::BTreeMap;

use cmt_core::Stage;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::milestone::{MilestoneRef, MilestoneSpec};

/// Environment variable consulted when no token is configured.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

fn default_api_url() -> String {
    String::from("https://api.github.com")
}

fn default_observation_markers() -> Vec<String> {
    vec![
        String::from("**OBSERVATION:**"),
        String::from("**COMMENTER OBSERVATION:**"),
    ]
}

/// How observations are pulled back out of issue discussions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    /// Marker phrases that open a quoted observation block, tried in order.
    #[serde(default = "default_observation_markers")]
    pub observation_markers: Vec<String>,

    /// Use the most recent issue comment when no marker block is found.
    #[serde(default)]
    pub fallback_to_last_comment: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            observation_markers: default_observation_markers(),
            fallback_to_last_comment: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubConfig {
    /// Target repository as `owner/name`.
    #[serde(default)]
    pub repository: String,

    /// Access token. Falls back to `GITHUB_TOKEN` when empty.
    #[serde(default)]
    pub token: String,

    /// REST API base URL (GitHub Enterprise or a test server).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub default_labels: Vec<String>,

    /// Extra labels keyed by stage name (e.g. `DIS`).
    #[serde(default)]
    pub stage_labels: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub default_assignee: Option<String>,

    #[serde(default)]
    pub milestone: Option<MilestoneSpec>,

    /// Milestones keyed by stage name; a number or an exact title.
    #[serde(default)]
    pub stage_milestones: BTreeMap<String, MilestoneRef>,

    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repository: String::new(),
            token: String::new(),
            api_url: default_api_url(),
            default_labels: Vec::new(),
            stage_labels: BTreeMap::new(),
            default_assignee: None,
            milestone: None,
            stage_milestones: BTreeMap::new(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl GithubConfig {
    /// Check that repository and token are present and well formed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] for a missing repository or
    /// token and [`ConfigError::InvalidValue`] for a malformed repository.
    pub fn ensure_ready(&self) -> Result<(), ConfigError> {
        if self.repository.trim().is_empty() {
            return Err(ConfigError::NotConfigured {
                message: "GitHub repository not specified in config".into(),
            });
        }
        let valid_slug = self
            .repository
            .split_once('/')
            .is_some_and(|(owner, name)| {
                !owner.is_empty() && !name.is_empty() && !name.contains('/')
            });
        if !valid_slug {
            return Err(ConfigError::InvalidValue {
                field: "github.repository".into(),
                reason: format!("expected 'owner/name', got '{}'", self.repository),
            });
        }
        if self.token.trim().is_empty() {
            return Err(ConfigError::NotConfigured {
                message: format!(
                    "GitHub token not found. Set {TOKEN_ENV_VAR} environment variable or specify in config file."
                ),
            });
        }
        Ok(())
    }

    /// Fill an empty token from `GITHUB_TOKEN`.
    pub fn apply_env_token(&mut self) {
        if self.token.trim().is_empty()
            && let Ok(token) = std::env::var(TOKEN_ENV_VAR)
        {
            self.token = token;
        }
    }

    /// Labels configured for `stage`, empty when none are.
    #[must_use]
    pub fn labels_for_stage(&self, stage: Option<&Stage>) -> &[String] {
        stage
            .and_then(|stage| stage_entry(&self.stage_labels, stage))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn milestone_for_stage(&self, stage: Option<&Stage>) -> Option<MilestoneRef> {
        stage
            .and_then(|stage| stage_entry(&self.stage_milestones, stage))
            .cloned()
            .map(MilestoneRef::normalized)
    }

    #[must_use]
    pub fn global_milestone(&self) -> Option<MilestoneRef> {
        self.milestone.as_ref().and_then(MilestoneSpec::to_ref)
    }
}

/// Entry for `stage`, keys compared without case. Environment overrides
/// arrive lower-cased.
fn stage_entry<'m, V>(map: &'m BTreeMap<String, V>, stage: &Stage) -> Option<&'m V> {
    let name = stage.as_str();
    map.get(name).or_else(|| {
        map.iter()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}
