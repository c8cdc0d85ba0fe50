//! Observation retrieval: dispositions from issue threads back into the sheet.

use std::path::Path;

use chrono::Utc;
use cmt_config::RetrievalConfig;
use cmt_core::interchange::{self, DEFAULT_SCHEMA_REF};
use cmt_core::{Comment, CommentSheet, IssueState};
use cmt_tracker::{IssueTracker, TrackerError};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::SyncError;
use crate::observation::select_observation;

#[derive(Debug, Clone, Copy, Default)]
pub struct RetrieveOptions {
    /// Also read issues that are still open.
    pub include_open: bool,
    /// Report what would be retrieved without touching the sheet.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RetrieveOutcome {
    Retrieved {
        observation: String,
    },
    Skipped {
        message: String,
    },
    Error {
        message: String,
    },
    Preview {
        state: IssueState,
        observation: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrieveResult {
    pub comment_id: String,
    pub issue_number: u64,
    #[serde(flatten)]
    pub outcome: RetrieveOutcome,
}

impl RetrieveResult {
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self.outcome {
            RetrieveOutcome::Retrieved { .. } => "retrieved",
            RetrieveOutcome::Skipped { .. } => "skipped",
            RetrieveOutcome::Error { .. } => "error",
            RetrieveOutcome::Preview { .. } => "preview",
        }
    }
}

/// Pulls observations out of the discussion threads of linked issues.
pub struct ObservationRetriever<'a, T> {
    tracker: &'a T,
    config: &'a RetrievalConfig,
}

impl<'a, T: IssueTracker> ObservationRetriever<'a, T> {
    #[must_use]
    pub const fn new(tracker: &'a T, config: &'a RetrievalConfig) -> Self {
        Self { tracker, config }
    }

    /// Process the comments of `sheet` that have a tracker link, in order.
    ///
    /// A found observation overwrites `observations` and refreshes the
    /// link's status and `updated_at`. Tracker failures are reported per
    /// comment. A dry run leaves `sheet` untouched.
    pub async fn retrieve(
        &self,
        sheet: &mut CommentSheet,
        options: &RetrieveOptions,
    ) -> Vec<RetrieveResult> {
        let mut results = Vec::new();
        for comment in &mut sheet.comments {
            let Some(issue_number) = comment.tracker_issue_number() else {
                continue;
            };
            info!(comment = %comment.id, issue_number, "retrieving observation");

            let outcome = if options.dry_run {
                self.preview(issue_number).await
            } else {
                self.retrieve_one(comment, issue_number, options).await
            };
            let outcome = outcome.unwrap_or_else(|e| {
                warn!(comment = %comment.id, issue_number, error = %e, "retrieval failed");
                RetrieveOutcome::Error {
                    message: e.to_string(),
                }
            });
            results.push(RetrieveResult {
                comment_id: comment.id.clone(),
                issue_number,
                outcome,
            });
        }
        results
    }

    /// Read `input`, run [`Self::retrieve`], and write the sheet to
    /// `output` (default `input`) once, unless this is a dry run or no
    /// comment has a tracker link.
    ///
    /// # Errors
    ///
    /// [`SyncError::Core`] when the file cannot be read or written.
    pub async fn retrieve_file(
        &self,
        input: &Path,
        output: Option<&Path>,
        options: &RetrieveOptions,
    ) -> Result<Vec<RetrieveResult>, SyncError> {
        let mut sheet = interchange::read_sheet(input)?;
        let results = self.retrieve(&mut sheet, options).await;
        if !options.dry_run && !results.is_empty() {
            let target = output.unwrap_or(input);
            interchange::write_sheet(target, &sheet, Some(DEFAULT_SCHEMA_REF))?;
            info!(path = %target.display(), "updated comment file");
        }
        Ok(results)
    }

    async fn observation(&self, issue_number: u64) -> Result<Option<String>, TrackerError> {
        let comments = self.tracker.list_issue_comments(issue_number).await?;
        Ok(select_observation(
            &comments,
            &self.config.observation_markers,
            self.config.fallback_to_last_comment,
        ))
    }

    async fn preview(&self, issue_number: u64) -> Result<RetrieveOutcome, TrackerError> {
        let issue = self.tracker.get_issue(issue_number).await?;
        let observation = self.observation(issue_number).await?;
        Ok(RetrieveOutcome::Preview {
            state: issue.state,
            observation,
        })
    }

    async fn retrieve_one(
        &self,
        comment: &mut Comment,
        issue_number: u64,
        options: &RetrieveOptions,
    ) -> Result<RetrieveOutcome, TrackerError> {
        let issue = self.tracker.get_issue(issue_number).await?;
        if issue.state == IssueState::Open && !options.include_open {
            return Ok(RetrieveOutcome::Skipped {
                message: "Issue is still open".to_string(),
            });
        }

        let Some(observation) = self.observation(issue_number).await? else {
            return Ok(RetrieveOutcome::Skipped {
                message: "No observation found in issue".to_string(),
            });
        };

        comment.observations = Some(observation.clone());
        if let Some(link) = comment.tracker_link.as_mut() {
            link.status = issue.state;
            link.updated_at = Some(Utc::now());
        }
        info!(comment = %comment.id, issue_number, "observation retrieved");
        Ok(RetrieveOutcome::Retrieved { observation })
    }
}
