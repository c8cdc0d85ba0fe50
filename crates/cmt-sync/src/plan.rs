//! Labels, assignees and milestone for a new issue.

use cmt_config::{GithubConfig, MilestoneRef};
use cmt_core::{Comment, Stage};
use cmt_tracker::IssueTracker;
use tracing::{debug, warn};

/// Default labels, then the stage's labels, then the comment type code.
/// Repeats keep their first position.
#[must_use]
pub fn issue_labels(config: &GithubConfig, stage: Option<&Stage>, comment: &Comment) -> Vec<String> {
    let type_label = (!comment.comment_type.is_empty()).then_some(&comment.comment_type);
    let mut labels: Vec<String> = Vec::new();
    for label in config
        .default_labels
        .iter()
        .chain(config.labels_for_stage(stage))
        .chain(type_label)
    {
        if !labels.contains(label) {
            labels.push(label.clone());
        }
    }
    labels
}

/// The override, else the configured default, else nobody.
#[must_use]
pub fn issue_assignees(config: &GithubConfig, assignee_override: Option<&str>) -> Vec<String> {
    assignee_override
        .or(config.default_assignee.as_deref())
        .filter(|login| !login.trim().is_empty())
        .map(|login| vec![login.to_string()])
        .unwrap_or_default()
}

/// The milestone reference in effect: override, then stage, then global.
#[must_use]
pub fn milestone_ref(
    config: &GithubConfig,
    stage: Option<&Stage>,
    milestone_override: Option<&MilestoneRef>,
) -> Option<MilestoneRef> {
    milestone_override
        .cloned()
        .map(MilestoneRef::normalized)
        .or_else(|| config.milestone_for_stage(stage))
        .or_else(|| config.global_milestone())
}

/// Resolve a reference to a milestone number. Names are matched exactly
/// against all milestones; an unknown name or a listing failure gives
/// `None`.
pub async fn resolve_milestone(
    tracker: &impl IssueTracker,
    milestone: Option<&MilestoneRef>,
) -> Option<u64> {
    match milestone? {
        MilestoneRef::Number(number) => Some(*number),
        MilestoneRef::Name(name) => match tracker.list_milestones().await {
            Ok(milestones) => {
                let found = milestones.iter().find(|m| &m.title == name).map(|m| m.number);
                if found.is_none() {
                    debug!(milestone = %name, "no milestone with that title");
                }
                found
            }
            Err(e) => {
                warn!(milestone = %name, error = %e, "could not list milestones");
                None
            }
        },
    }
}
