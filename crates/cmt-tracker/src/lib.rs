//! # cmt-tracker
//!
//! Issue tracker access for commenter.
//!
//! The [`IssueTracker`] trait is the narrow surface the synchronizer needs:
//! create, search, fetch, list discussion comments, list milestones.
//! Implementations:
//! - [`GithubClient`]: GitHub REST v3 over `reqwest`
//! - [`MemoryTracker`]: in-process tracker for tests and offline runs

pub mod github;
pub mod memory;

mod error;
mod http;

use std::future::Future;

use chrono::{DateTime, Utc};
use cmt_core::IssueState;
use serde::{Deserialize, Serialize};

pub use error::TrackerError;
pub use github::GithubClient;
pub use memory::{MemoryTracker, TrackerOperation};

// ── Types ──────────────────────────────────────────────────────────

/// Payload for a new issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
}

/// Identity of an issue the tracker just created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedIssue {
    pub number: u64,
    #[serde(rename = "html_url")]
    pub url: String,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueSummary {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub state: IssueState,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub state: IssueState,
}

/// A discussion comment on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueComment {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
}

// ── Trait ──────────────────────────────────────────────────────────

/// Operations the synchronizer performs against an issue tracker.
///
/// Every method is a single awaited call; there is no retry.
pub trait IssueTracker {
    /// Open a new issue.
    fn create_issue(
        &self,
        issue: &NewIssue,
    ) -> impl Future<Output = Result<CreatedIssue, TrackerError>> + Send;

    /// Search issues with a tracker query string.
    fn search_issues(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<IssueSummary>, TrackerError>> + Send;

    fn get_issue(&self, number: u64) -> impl Future<Output = Result<Issue, TrackerError>> + Send;

    /// All discussion comments of an issue, oldest first.
    fn list_issue_comments(
        &self,
        number: u64,
    ) -> impl Future<Output = Result<Vec<IssueComment>, TrackerError>> + Send;

    /// All milestones, open and closed.
    fn list_milestones(&self) -> impl Future<Output = Result<Vec<Milestone>, TrackerError>> + Send;
}
