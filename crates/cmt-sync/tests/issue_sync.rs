//! Creation and retrieval against the in-memory tracker.

use std::collections::BTreeMap;

use cmt_config::{GithubConfig, MilestoneRef, RetrievalConfig};
use cmt_core::interchange::{read_sheet, write_sheet};
use cmt_core::{Comment, CommentSheet, IssueState, Locality, Stage, TrackerLink};
use cmt_sync::{
    BatchSummary, CreateOptions, CreateOutcome, IssueSynchronizer, IssueTemplates,
    ObservationRetriever, RetrieveOptions, RetrieveOutcome,
};
use cmt_tracker::{MemoryTracker, TrackerOperation};
use pretty_assertions::assert_eq;

fn config() -> GithubConfig {
    GithubConfig {
        repository: "iso/tc154".into(),
        token: "t".into(),
        default_labels: vec!["comment-review".into()],
        stage_labels: BTreeMap::from([(
            "DIS".to_string(),
            vec!["draft-international-standard".to_string()],
        )]),
        ..GithubConfig::default()
    }
}

fn sheet() -> CommentSheet {
    let first = Comment {
        locality: Locality {
            clause: Some("5.1".into()),
            element: Some("Table 1".into()),
            line_number: None,
        },
        comment_type: "te".into(),
        comments: "Test comment text. Second sentence.".into(),
        proposed_change: Some("Use the correct symbol".into()),
        ..Comment::new("US-001")
    };
    let second = Comment {
        comment_type: "ed".into(),
        comments: "Typo in the foreword".into(),
        ..Comment::new("DE-002")
    };
    CommentSheet {
        document: Some("ISO 80000-2:2019".into()),
        stage: Some(Stage::Dis),
        ..CommentSheet::new(vec![first, second])
    }
}

fn linked(id: &str, issue_number: u64) -> Comment {
    Comment {
        tracker_link: Some(TrackerLink::opened(
            issue_number,
            format!("https://github.com/iso/tc154/issues/{issue_number}"),
            chrono::Utc::now(),
        )),
        ..Comment::new(id)
    }
}

#[tokio::test]
async fn creates_issues_and_links_comments() {
    let tracker = MemoryTracker::new("iso/tc154");
    let config = config();
    let sync = IssueSynchronizer::new(&tracker, &config, IssueTemplates::default()).unwrap();
    let mut sheet = sheet();

    let results = sync.sync(&mut sheet, &CreateOptions::default()).await.unwrap();

    assert_eq!(
        results.iter().map(|r| r.status()).collect::<Vec<_>>(),
        ["created", "created"]
    );
    let link = sheet.comments[0].tracker_link.as_ref().unwrap();
    assert_eq!(link.issue_number, 1);
    assert_eq!(link.status, IssueState::Open);
    assert!(link.created_at.is_some());

    let issue = tracker.created(1).unwrap();
    assert_eq!(issue.title, "US-001: Clause 5.1, Table 1: Test comment text");
    assert_eq!(
        issue.labels,
        ["comment-review", "draft-international-standard", "te"]
    );
    assert!(issue.body.contains("Use the correct symbol"));
    assert!(issue.body.contains("Technical"));
}

#[tokio::test]
async fn second_run_skips_existing_issues() {
    let tracker = MemoryTracker::new("iso/tc154");
    let config = config();
    let sync = IssueSynchronizer::new(&tracker, &config, IssueTemplates::default()).unwrap();

    let mut first = sheet();
    sync.sync(&mut first, &CreateOptions::default()).await.unwrap();

    // A fresh copy without links relies on the tracker search.
    let mut second = sheet();
    let results = sync.sync(&mut second, &CreateOptions::default()).await.unwrap();

    assert_eq!(tracker.issue_count(), 2);
    assert_eq!(tracker.write_calls(), 2);
    assert!(results.iter().all(|r| r.status() == "skipped"));
    assert_eq!(
        results[0].outcome,
        CreateOutcome::Skipped {
            message: "Issue already exists".into(),
            issue_url: "https://github.com/iso/tc154/issues/1".into(),
        }
    );
}

#[tokio::test]
async fn only_whole_id_matches_count_as_existing_issues() {
    let tracker = MemoryTracker::new("iso/tc154");
    tracker.insert_issue("US-10: Clause 3", IssueState::Open);
    let config = config();
    let sync = IssueSynchronizer::new(&tracker, &config, IssueTemplates::default()).unwrap();
    let mut sheet = CommentSheet::new(vec![
        Comment {
            comments: "Continuation of the previous row".into(),
            ..Comment::new("")
        },
        Comment {
            comments: "Shorter id".into(),
            ..Comment::new("US-1")
        },
        Comment {
            comments: "Same id".into(),
            ..Comment::new("US-10")
        },
    ]);

    let results = sync.sync(&mut sheet, &CreateOptions::default()).await.unwrap();

    assert_eq!(
        results.iter().map(|r| r.status()).collect::<Vec<_>>(),
        ["created", "created", "skipped"]
    );
    assert_eq!(tracker.issue_count(), 3);
    assert!(sheet.comments[0].tracker_link.is_some());
    assert_eq!(sheet.comments[1].tracker_issue_number(), Some(3));
}

#[tokio::test]
async fn search_failure_is_treated_as_not_found() {
    let tracker = MemoryTracker::new("iso/tc154");
    tracker.fail(TrackerOperation::Search);
    let config = config();
    let sync = IssueSynchronizer::new(&tracker, &config, IssueTemplates::default()).unwrap();

    let results = sync.sync(&mut sheet(), &CreateOptions::default()).await.unwrap();
    assert!(results.iter().all(|r| r.status() == "created"));
}

#[tokio::test]
async fn creation_errors_do_not_stop_the_batch() {
    let tracker = MemoryTracker::new("iso/tc154");
    tracker.reject_titles_containing("US-001");
    let config = config();
    let sync = IssueSynchronizer::new(&tracker, &config, IssueTemplates::default()).unwrap();
    let mut sheet = sheet();

    let results = sync.sync(&mut sheet, &CreateOptions::default()).await.unwrap();

    assert_eq!(results[0].status(), "error");
    assert_eq!(results[1].status(), "created");
    assert!(sheet.comments[0].tracker_link.is_none());
    assert!(sheet.comments[1].tracker_link.is_some());
    let summary = BatchSummary::of_created(&results);
    assert_eq!((summary.total, summary.succeeded, summary.errors), (2, 1, 1));
}

#[tokio::test]
async fn overrides_flow_into_the_issue() {
    let tracker = MemoryTracker::new("iso/tc154");
    tracker.add_milestone(5, "FDIS ballot");
    let config = GithubConfig {
        stage_labels: BTreeMap::from([("FDIS".to_string(), vec!["final".to_string()])]),
        default_assignee: Some("convenor".into()),
        ..config()
    };
    let sync = IssueSynchronizer::new(&tracker, &config, IssueTemplates::default()).unwrap();
    let mut sheet = sheet();
    let options = CreateOptions {
        stage: Some(Stage::Fdis),
        assignee: Some("editor".into()),
        milestone: Some(MilestoneRef::Name("FDIS ballot".into())),
        dry_run: false,
    };

    sync.sync(&mut sheet, &options).await.unwrap();

    assert_eq!(sheet.stage, Some(Stage::Fdis));
    let issue = tracker.created(1).unwrap();
    assert_eq!(issue.labels, ["comment-review", "final", "te"]);
    assert_eq!(issue.assignees, ["editor"]);
    assert_eq!(issue.milestone, Some(5));
}

#[tokio::test]
async fn dry_run_previews_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comments.yaml");
    write_sheet(&path, &sheet(), None).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let tracker = MemoryTracker::new("iso/tc154");
    let config = config();
    let sync = IssueSynchronizer::new(&tracker, &config, IssueTemplates::default()).unwrap();
    let options = CreateOptions {
        dry_run: true,
        ..CreateOptions::default()
    };

    let results = sync.sync_file(&path, None, &options).await.unwrap();

    assert_eq!(tracker.write_calls(), 0);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    let CreateOutcome::Preview(preview) = &results[0].outcome else {
        panic!("expected a preview, got {:?}", results[0]);
    };
    assert_eq!(preview.title, "US-001: Clause 5.1, Table 1: Test comment text");
    assert_eq!(preview.milestone, None);
    assert_eq!(BatchSummary::of_created(&results).previewed, 2);
}

#[tokio::test]
async fn sync_file_writes_once_with_schema_header() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("comments.yaml");
    let output = dir.path().join("out").join("linked.yaml");
    write_sheet(&input, &sheet(), None).unwrap();
    let before = std::fs::read_to_string(&input).unwrap();

    let tracker = MemoryTracker::new("iso/tc154");
    let config = config();
    let sync = IssueSynchronizer::new(&tracker, &config, IssueTemplates::default()).unwrap();
    sync.sync_file(&input, Some(&output), &CreateOptions::default())
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&input).unwrap(), before);
    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("# yaml-language-server: $schema="));
    let reread = read_sheet(&output).unwrap();
    assert_eq!(reread.linked_count(), 2);
}

#[tokio::test]
async fn bad_custom_template_is_fatal() {
    let tracker = MemoryTracker::default();
    let config = config();
    let templates = IssueTemplates {
        title: "{% if comment_id %}unclosed".into(),
        ..IssueTemplates::default()
    };
    assert!(IssueSynchronizer::new(&tracker, &config, templates).is_err());
}

// ── Retrieval ──────────────────────────────────────────────────────

fn seeded_tracker() -> MemoryTracker {
    let tracker = MemoryTracker::new("iso/tc154");
    let closed = tracker.insert_issue("US-001: Clause 5.1", IssueState::Closed);
    tracker.add_comment(closed, "> **OBSERVATION:**\n> Rejected");
    tracker.add_comment(closed, "> **OBSERVATION:**\n> Accepted, see clause 6");
    tracker.add_comment(closed, "Closing, thanks.");
    let open = tracker.insert_issue("DE-002: Foreword", IssueState::Open);
    tracker.add_comment(open, "> **OBSERVATION:**\n> Noted");
    tracker
}

fn linked_sheet() -> CommentSheet {
    CommentSheet::new(vec![linked("US-001", 1), linked("DE-002", 2), Comment::new("FR-003")])
}

#[tokio::test]
async fn retrieves_newest_observation_from_closed_issues() {
    let tracker = seeded_tracker();
    let retrieval = RetrievalConfig::default();
    let retriever = ObservationRetriever::new(&tracker, &retrieval);
    let mut sheet = linked_sheet();

    let results = retriever.retrieve(&mut sheet, &RetrieveOptions::default()).await;

    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0].outcome,
        RetrieveOutcome::Retrieved {
            observation: "Accepted, see clause 6".into()
        }
    );
    assert_eq!(
        results[1].outcome,
        RetrieveOutcome::Skipped {
            message: "Issue is still open".into()
        }
    );
    let first = &sheet.comments[0];
    assert_eq!(first.observations.as_deref(), Some("Accepted, see clause 6"));
    let link = first.tracker_link.as_ref().unwrap();
    assert_eq!(link.status, IssueState::Closed);
    assert!(link.updated_at.is_some());
    assert_eq!(sheet.comments[1].observations, None);
}

#[tokio::test]
async fn include_open_and_missing_observation() {
    let tracker = seeded_tracker();
    let bare = tracker.insert_issue("FR-003", IssueState::Closed);
    tracker.add_comment(bare, "Discussed at the meeting.");
    let retrieval = RetrievalConfig::default();
    let retriever = ObservationRetriever::new(&tracker, &retrieval);
    let mut sheet = CommentSheet::new(vec![linked("DE-002", 2), linked("FR-003", bare)]);
    let options = RetrieveOptions {
        include_open: true,
        dry_run: false,
    };

    let results = retriever.retrieve(&mut sheet, &options).await;

    assert_eq!(results[0].status(), "retrieved");
    assert_eq!(sheet.comments[0].observations.as_deref(), Some("Noted"));
    assert_eq!(
        results[1].outcome,
        RetrieveOutcome::Skipped {
            message: "No observation found in issue".into()
        }
    );
}

#[tokio::test]
async fn fallback_to_last_comment() {
    let tracker = MemoryTracker::new("iso/tc154");
    let number = tracker.insert_issue("FR-003", IssueState::Closed);
    tracker.add_comment(number, "  Will be fixed in the next draft.\n");
    let retrieval = RetrievalConfig {
        fallback_to_last_comment: true,
        ..RetrievalConfig::default()
    };
    let retriever = ObservationRetriever::new(&tracker, &retrieval);
    let mut sheet = CommentSheet::new(vec![linked("FR-003", number)]);

    retriever.retrieve(&mut sheet, &RetrieveOptions::default()).await;

    assert_eq!(
        sheet.comments[0].observations.as_deref(),
        Some("Will be fixed in the next draft.")
    );
}

#[tokio::test]
async fn tracker_errors_are_reported_per_comment() {
    let tracker = seeded_tracker();
    tracker.fail_issue(1);
    let retrieval = RetrievalConfig::default();
    let retriever = ObservationRetriever::new(&tracker, &retrieval);
    let mut sheet = linked_sheet();
    let options = RetrieveOptions {
        include_open: true,
        dry_run: false,
    };

    let results = retriever.retrieve(&mut sheet, &options).await;

    assert_eq!(results[0].status(), "error");
    assert_eq!(results[1].status(), "retrieved");
    let summary = BatchSummary::of_retrieved(&results);
    assert_eq!((summary.errors, summary.succeeded), (1, 1));
}

#[tokio::test]
async fn retrieval_dry_run_previews_state_and_keeps_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comments.yaml");
    write_sheet(&path, &linked_sheet(), None).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let tracker = seeded_tracker();
    let retrieval = RetrievalConfig::default();
    let retriever = ObservationRetriever::new(&tracker, &retrieval);
    let options = RetrieveOptions {
        include_open: false,
        dry_run: true,
    };

    let results = retriever.retrieve_file(&path, None, &options).await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    assert_eq!(
        results[1].outcome,
        RetrieveOutcome::Preview {
            state: IssueState::Open,
            observation: Some("Noted".into()),
        }
    );
    assert_eq!(tracker.write_calls(), 0);
}

#[tokio::test]
async fn retrieve_file_writes_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comments.yaml");
    write_sheet(&path, &linked_sheet(), None).unwrap();

    let tracker = seeded_tracker();
    let retrieval = RetrievalConfig::default();
    let retriever = ObservationRetriever::new(&tracker, &retrieval);
    retriever
        .retrieve_file(&path, None, &RetrieveOptions::default())
        .await
        .unwrap();

    let reread = read_sheet(&path).unwrap();
    assert_eq!(
        reread.comments[0].observations.as_deref(),
        Some("Accepted, see clause 6")
    );
    assert!(std::fs::read_to_string(&path).unwrap().starts_with("# yaml-language-server"));
}

#[tokio::test]
async fn results_serialize_with_status_tag() {
    let tracker = seeded_tracker();
    let retrieval = RetrievalConfig::default();
    let retriever = ObservationRetriever::new(&tracker, &retrieval);
    let results = retriever
        .retrieve(&mut linked_sheet(), &RetrieveOptions::default())
        .await;

    let json = serde_json::to_value(&results[0]).unwrap();
    assert_eq!(json["status"], "retrieved");
    assert_eq!(json["comment_id"], "US-001");
    assert_eq!(json["issue_number"], 1);
}
