use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// State of a linked tracker issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
}

impl IssueState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Association between a comment and the tracker issue created for it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrackerLink {
    pub issue_number: u64,
    #[serde(default)]
    pub issue_url: String,
    #[serde(default)]
    pub status: IssueState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TrackerLink {
    /// Link for a freshly created, open issue.
    #[must_use]
    pub fn opened(issue_number: u64, issue_url: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            issue_number,
            issue_url: issue_url.into(),
            status: IssueState::Open,
            created_at: Some(at),
            updated_at: None,
        }
    }
}

/// Link fields as found in a hand-edited file, where any of them may be
/// missing.
#[derive(Deserialize)]
struct PartialLink {
    #[serde(default)]
    issue_number: Option<u64>,
    #[serde(default)]
    issue_url: String,
    #[serde(default)]
    status: IssueState,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Decode an optional link. A mapping without `issue_number` (including
/// `{}`) means no issue has been created yet.
pub(crate) fn optional_link<'de, D>(deserializer: D) -> Result<Option<TrackerLink>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(partial) = Option::<PartialLink>::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(partial.issue_number.map(|issue_number| TrackerLink {
        issue_number,
        issue_url: partial.issue_url,
        status: partial.status,
        created_at: partial.created_at,
        updated_at: partial.updated_at,
    }))
}
