//! Issue creation: one tracker issue per comment, linked back into the sheet.

use std::path::Path;

use chrono::Utc;
use cmt_config::{GithubConfig, MilestoneRef};
use cmt_core::interchange::{self, DEFAULT_SCHEMA_REF};
use cmt_core::{Comment, CommentSheet, Stage, TrackerLink};
use cmt_tracker::{IssueTracker, NewIssue};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::SyncError;
use crate::plan::{issue_assignees, issue_labels, milestone_ref, resolve_milestone};
use crate::template::{IssueTemplates, LiquidEngine, TemplateEngine};
use crate::variables::template_variables;

#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Stage to use instead of the sheet's; recorded on the sheet.
    pub stage: Option<Stage>,
    pub assignee: Option<String>,
    pub milestone: Option<MilestoneRef>,
    /// Render and plan without searching, creating or writing.
    pub dry_run: bool,
}

/// What a dry run would send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuePreview {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub milestone: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CreateOutcome {
    Created { issue_number: u64, issue_url: String },
    Skipped { message: String, issue_url: String },
    Error { message: String },
    Preview(IssuePreview),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateResult {
    pub comment_id: String,
    #[serde(flatten)]
    pub outcome: CreateOutcome,
}

impl CreateResult {
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self.outcome {
            CreateOutcome::Created { .. } => "created",
            CreateOutcome::Skipped { .. } => "skipped",
            CreateOutcome::Error { .. } => "error",
            CreateOutcome::Preview(_) => "preview",
        }
    }
}

/// Creates tracker issues for the comments of a sheet.
///
/// Runs are idempotent as far as the tracker's search allows: a comment
/// whose id already appears in an issue title is skipped. Two runs racing
/// against the same repository can still both create an issue.
pub struct IssueSynchronizer<'a, T, E = LiquidEngine> {
    tracker: &'a T,
    config: &'a GithubConfig,
    templates: IssueTemplates,
    engine: E,
}

impl<'a, T: IssueTracker> IssueSynchronizer<'a, T> {
    /// # Errors
    ///
    /// [`SyncError::Template`] when either template is malformed.
    pub fn new(
        tracker: &'a T,
        config: &'a GithubConfig,
        templates: IssueTemplates,
    ) -> Result<Self, SyncError> {
        Self::with_engine(tracker, config, templates, LiquidEngine::new()?)
    }
}

impl<'a, T: IssueTracker, E: TemplateEngine> IssueSynchronizer<'a, T, E> {
    /// # Errors
    ///
    /// [`SyncError::Template`] when `engine` rejects either template.
    pub fn with_engine(
        tracker: &'a T,
        config: &'a GithubConfig,
        templates: IssueTemplates,
        engine: E,
    ) -> Result<Self, SyncError> {
        engine.check(&templates.title)?;
        engine.check(&templates.body)?;
        Ok(Self {
            tracker,
            config,
            templates,
            engine,
        })
    }

    /// Process every comment of `sheet` in order.
    ///
    /// The stage override is stored on `sheet`. Outside a dry run each
    /// created issue is linked on its comment. Per-comment failures become
    /// [`CreateOutcome::Error`] and the batch goes on.
    ///
    /// # Errors
    ///
    /// [`SyncError::Template`] when rendering fails.
    pub async fn sync(
        &self,
        sheet: &mut CommentSheet,
        options: &CreateOptions,
    ) -> Result<Vec<CreateResult>, SyncError> {
        if let Some(stage) = &options.stage {
            sheet.stage = Some(stage.clone());
        }

        let mut results = Vec::with_capacity(sheet.comments.len());
        for index in 0..sheet.comments.len() {
            let comment = &sheet.comments[index];
            let comment_id = comment.id.clone();
            info!(comment = %comment_id, dry_run = options.dry_run, "processing comment");

            if !options.dry_run
                && let Some(outcome) = self.existing_issue(comment).await
            {
                info!(comment = %comment_id, "issue already exists, skipping");
                results.push(CreateResult { comment_id, outcome });
                continue;
            }

            let preview = self.plan(comment, sheet, options).await?;
            if options.dry_run {
                results.push(CreateResult {
                    comment_id,
                    outcome: CreateOutcome::Preview(preview),
                });
                continue;
            }

            let outcome = self.create(&mut sheet.comments[index], preview).await;
            results.push(CreateResult { comment_id, outcome });
        }
        Ok(results)
    }

    /// Read `input`, run [`Self::sync`], and write the sheet to `output`
    /// (default `input`) once, unless this is a dry run or nothing was
    /// processed.
    ///
    /// # Errors
    ///
    /// [`SyncError::Core`] when the file cannot be read or written,
    /// [`SyncError::Template`] when rendering fails.
    pub async fn sync_file(
        &self,
        input: &Path,
        output: Option<&Path>,
        options: &CreateOptions,
    ) -> Result<Vec<CreateResult>, SyncError> {
        let mut sheet = interchange::read_sheet(input)?;
        if let Err(e) = sheet.validate() {
            warn!(error = %e, "comment sheet failed validation");
        }
        let results = self.sync(&mut sheet, options).await?;
        if !options.dry_run && !results.is_empty() {
            let target = output.unwrap_or(input);
            interchange::write_sheet(target, &sheet, Some(DEFAULT_SCHEMA_REF))?;
            info!(path = %target.display(), "updated comment file");
        }
        Ok(results)
    }

    async fn existing_issue(&self, comment: &Comment) -> Option<CreateOutcome> {
        if let Some(link) = &comment.tracker_link {
            return Some(CreateOutcome::Skipped {
                message: "Issue already exists".to_string(),
                issue_url: link.issue_url.clone(),
            });
        }

        let id = comment.id.trim();
        if id.is_empty() {
            return None;
        }

        let query = format!("repo:{} is:issue in:title {id}", self.config.repository);
        match self.tracker.search_issues(&query).await {
            Ok(hits) => hits
                .into_iter()
                .find(|hit| title_mentions(&hit.title, id))
                .map(|hit| CreateOutcome::Skipped {
                    message: "Issue already exists".to_string(),
                    issue_url: hit.html_url,
                }),
            Err(e) => {
                debug!(comment = %comment.id, error = %e, "existing-issue search failed");
                None
            }
        }
    }

    async fn plan(
        &self,
        comment: &Comment,
        sheet: &CommentSheet,
        options: &CreateOptions,
    ) -> Result<IssuePreview, SyncError> {
        let variables = template_variables(comment, sheet);
        let title = self.engine.expand(&self.templates.title, &variables)?;
        let body = self.engine.expand(&self.templates.body, &variables)?;
        let stage = sheet.stage.as_ref();
        let milestone = milestone_ref(self.config, stage, options.milestone.as_ref());

        Ok(IssuePreview {
            title: title.trim().to_string(),
            body,
            labels: issue_labels(self.config, stage, comment),
            assignees: issue_assignees(self.config, options.assignee.as_deref()),
            milestone: resolve_milestone(self.tracker, milestone.as_ref()).await,
        })
    }

    async fn create(&self, comment: &mut Comment, preview: IssuePreview) -> CreateOutcome {
        let issue = NewIssue {
            title: preview.title,
            body: preview.body,
            labels: preview.labels,
            assignees: preview.assignees,
            milestone: preview.milestone,
        };
        debug!(comment = %comment.id, title = %issue.title, "creating issue");
        match self.tracker.create_issue(&issue).await {
            Ok(created) => {
                info!(comment = %comment.id, url = %created.url, "issue created");
                comment.tracker_link = Some(TrackerLink::opened(
                    created.number,
                    created.url.clone(),
                    Utc::now(),
                ));
                CreateOutcome::Created {
                    issue_number: created.number,
                    issue_url: created.url,
                }
            }
            Err(e) => {
                warn!(comment = %comment.id, error = %e, "issue creation failed");
                CreateOutcome::Error {
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Whether `title` carries `id` as a whole token, so `US-1` does not match
/// `US-10`.
fn title_mentions(title: &str, id: &str) -> bool {
    let pattern = format!(r"(?:^|[^\w-]){}(?:[^\w-]|$)", regex::escape(id));
    Regex::new(&pattern).is_ok_and(|re| re.is_match(title))
}
