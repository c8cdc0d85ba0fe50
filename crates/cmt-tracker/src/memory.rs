//! In-process [`IssueTracker`] for tests and offline runs.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use cmt_core::IssueState;

use crate::{
    CreatedIssue, Issue, IssueComment, IssueSummary, IssueTracker, Milestone, NewIssue,
    TrackerError,
};

/// Tracker operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerOperation {
    Create,
    Search,
    GetIssue,
    ListComments,
    ListMilestones,
}

#[derive(Debug, Clone)]
struct StoredIssue {
    issue: Issue,
    body: String,
    labels: Vec<String>,
    assignees: Vec<String>,
    milestone: Option<u64>,
    comments: Vec<IssueComment>,
}

#[derive(Debug, Default)]
struct State {
    issues: BTreeMap<u64, StoredIssue>,
    milestones: Vec<Milestone>,
    failing: HashSet<TrackerOperation>,
    failing_issues: HashSet<u64>,
    rejected_titles: Vec<String>,
    write_calls: usize,
    read_calls: usize,
}

impl State {
    fn check(&self, operation: TrackerOperation) -> Result<(), TrackerError> {
        if self.failing.contains(&operation) {
            return Err(injected());
        }
        Ok(())
    }

    fn issue(&self, number: u64) -> Result<&StoredIssue, TrackerError> {
        if self.failing_issues.contains(&number) {
            return Err(injected());
        }
        self.issues.get(&number).ok_or_else(|| TrackerError::Api {
            status: 404,
            message: "Not Found".to_string(),
        })
    }
}

fn injected() -> TrackerError {
    TrackerError::Api {
        status: 500,
        message: "injected failure".to_string(),
    }
}

/// Issues, discussion threads and milestones kept in memory.
///
/// Issue numbers are assigned sequentially from 1. Search matches issues
/// whose title contains every free term of the query; qualifiers such as
/// `repo:` or `in:title` are ignored.
#[derive(Debug)]
pub struct MemoryTracker {
    repository: String,
    state: Mutex<State>,
}

impl Default for MemoryTracker {
    fn default() -> Self {
        Self::new("example/repo")
    }
}

impl MemoryTracker {
    #[must_use]
    pub fn new(repository: &str) -> Self {
        Self {
            repository: repository.to_string(),
            state: Mutex::new(State::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn issue_url(&self, number: u64) -> String {
        format!("https://github.com/{}/issues/{number}", self.repository)
    }

    fn next_number(state: &State) -> u64 {
        state.issues.keys().next_back().map_or(1, |n| n + 1)
    }

    /// Seed an issue and return its number.
    pub fn insert_issue(&self, title: &str, state: IssueState) -> u64 {
        let mut guard = self.lock();
        let number = Self::next_number(&guard);
        let issue = Issue {
            number,
            title: title.to_string(),
            html_url: self.issue_url(number),
            state,
        };
        guard.issues.insert(
            number,
            StoredIssue {
                issue,
                body: String::new(),
                labels: Vec::new(),
                assignees: Vec::new(),
                milestone: None,
                comments: Vec::new(),
            },
        );
        number
    }

    /// Append a discussion comment. Unknown issues are ignored.
    pub fn add_comment(&self, number: u64, body: &str) {
        if let Some(stored) = self.lock().issues.get_mut(&number) {
            stored.comments.push(IssueComment {
                body: body.to_string(),
                created_at: Some(chrono::Utc::now()),
            });
        }
    }

    pub fn set_state(&self, number: u64, state: IssueState) {
        if let Some(stored) = self.lock().issues.get_mut(&number) {
            stored.issue.state = state;
        }
    }

    pub fn add_milestone(&self, number: u64, title: &str) {
        self.lock().milestones.push(Milestone {
            number,
            title: title.to_string(),
        });
    }

    /// Make every call of `operation` fail.
    pub fn fail(&self, operation: TrackerOperation) {
        self.lock().failing.insert(operation);
    }

    /// Make reads of one issue fail.
    pub fn fail_issue(&self, number: u64) {
        self.lock().failing_issues.insert(number);
    }

    /// Make creation fail for titles containing `fragment`.
    pub fn reject_titles_containing(&self, fragment: &str) {
        self.lock().rejected_titles.push(fragment.to_string());
    }

    /// Number of create calls received, successful or not.
    #[must_use]
    pub fn write_calls(&self) -> usize {
        self.lock().write_calls
    }

    /// Number of read calls received.
    #[must_use]
    pub fn read_calls(&self) -> usize {
        self.lock().read_calls
    }

    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.lock().issues.len()
    }

    /// The payload an issue was created with.
    #[must_use]
    pub fn created(&self, number: u64) -> Option<NewIssue> {
        self.lock().issues.get(&number).map(|stored| NewIssue {
            title: stored.issue.title.clone(),
            body: stored.body.clone(),
            labels: stored.labels.clone(),
            assignees: stored.assignees.clone(),
            milestone: stored.milestone,
        })
    }
}

impl IssueTracker for MemoryTracker {
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, TrackerError> {
        let mut state = self.lock();
        state.write_calls += 1;
        state.check(TrackerOperation::Create)?;
        if state
            .rejected_titles
            .iter()
            .any(|fragment| issue.title.contains(fragment.as_str()))
        {
            return Err(TrackerError::Api {
                status: 422,
                message: "Validation Failed".to_string(),
            });
        }

        let number = Self::next_number(&state);
        let url = self.issue_url(number);
        state.issues.insert(
            number,
            StoredIssue {
                issue: Issue {
                    number,
                    title: issue.title.clone(),
                    html_url: url.clone(),
                    state: IssueState::Open,
                },
                body: issue.body.clone(),
                labels: issue.labels.clone(),
                assignees: issue.assignees.clone(),
                milestone: issue.milestone,
                comments: Vec::new(),
            },
        );
        Ok(CreatedIssue { number, url })
    }

    async fn search_issues(&self, query: &str) -> Result<Vec<IssueSummary>, TrackerError> {
        let mut state = self.lock();
        state.read_calls += 1;
        state.check(TrackerOperation::Search)?;
        let terms: Vec<&str> = query
            .split_whitespace()
            .filter(|term| !term.contains(':'))
            .collect();
        Ok(state
            .issues
            .values()
            .filter(|stored| terms.iter().all(|term| stored.issue.title.contains(term)))
            .map(|stored| IssueSummary {
                number: stored.issue.number,
                title: stored.issue.title.clone(),
                html_url: stored.issue.html_url.clone(),
                state: stored.issue.state,
            })
            .collect())
    }

    async fn get_issue(&self, number: u64) -> Result<Issue, TrackerError> {
        let mut state = self.lock();
        state.read_calls += 1;
        state.check(TrackerOperation::GetIssue)?;
        Ok(state.issue(number)?.issue.clone())
    }

    async fn list_issue_comments(&self, number: u64) -> Result<Vec<IssueComment>, TrackerError> {
        let mut state = self.lock();
        state.read_calls += 1;
        state.check(TrackerOperation::ListComments)?;
        Ok(state.issue(number)?.comments.clone())
    }

    async fn list_milestones(&self) -> Result<Vec<Milestone>, TrackerError> {
        let mut state = self.lock();
        state.read_calls += 1;
        state.check(TrackerOperation::ListMilestones)?;
        Ok(state.milestones.clone())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn create_then_search_by_title() {
        let tracker = MemoryTracker::new("iso/tc");
        let created = tracker
            .create_issue(&NewIssue {
                title: "US-001: Clause 5.1".into(),
                labels: vec!["te".into()],
                ..NewIssue::default()
            })
            .await
            .unwrap();
        assert_eq!(created.number, 1);
        assert_eq!(created.url, "https://github.com/iso/tc/issues/1");

        let hits = tracker
            .search_issues("repo:iso/tc is:issue in:title US-001")
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert!(tracker.search_issues("in:title US-002").await.unwrap().is_empty());
        assert_eq!(tracker.created(1).unwrap().labels, ["te"]);
        assert_eq!(tracker.write_calls(), 1);
    }

    #[tokio::test]
    async fn comments_and_state() {
        let tracker = MemoryTracker::default();
        let number = tracker.insert_issue("US-001", IssueState::Open);
        tracker.add_comment(number, "first");
        tracker.add_comment(number, "second");
        tracker.set_state(number, IssueState::Closed);

        let issue = tracker.get_issue(number).await.unwrap();
        assert_eq!(issue.state, IssueState::Closed);
        let bodies: Vec<_> = tracker
            .list_issue_comments(number)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.body)
            .collect();
        assert_eq!(bodies, ["first", "second"]);
    }

    #[tokio::test]
    async fn injected_failures() {
        let tracker = MemoryTracker::default();
        let number = tracker.insert_issue("US-001", IssueState::Open);
        tracker.fail_issue(number);
        tracker.fail(TrackerOperation::ListMilestones);
        tracker.reject_titles_containing("bad");

        assert!(tracker.get_issue(number).await.is_err());
        assert!(matches!(
            tracker.get_issue(99).await,
            Err(TrackerError::Api { status: 404, .. })
        ));
        assert!(tracker.list_milestones().await.is_err());
        let rejected = tracker
            .create_issue(&NewIssue {
                title: "bad title".into(),
                ..NewIssue::default()
            })
            .await;
        assert!(rejected.is_err());
        assert_eq!(tracker.write_calls(), 1);
        assert_eq!(tracker.issue_count(), 1);
    }
}
