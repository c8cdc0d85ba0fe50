//! Interchange serialization tests: idempotence, omission rules, and input
//! normalization.

use chrono::{TimeZone, Utc};
use cmt_core::interchange::{self, DEFAULT_SCHEMA_REF};
use cmt_core::{Comment, CommentSheet, IssueState, Locality, Stage, TrackerLink};
use pretty_assertions::assert_eq;

fn sample_sheet() -> CommentSheet {
    CommentSheet {
        version: "2012-03".into(),
        date: Some("2024-06-04".into()),
        document: Some("ISO 80000-2:2019".into()),
        project: Some("Mathematics review".into()),
        stage: Some(Stage::Dis),
        comments: vec![
            Comment {
                id: "US-001".into(),
                body: "US".into(),
                locality: Locality {
                    clause: Some("5.1".into()),
                    element: Some("Table 1".into()),
                    line_number: Some("42".into()),
                },
                comment_type: "te".into(),
                comments: "Test comment".into(),
                proposed_change: Some("Test change".into()),
                observations: Some("Accepted".into()),
                tracker_link: Some(TrackerLink {
                    issue_number: 12,
                    issue_url: "https://github.com/org/repo/issues/12".into(),
                    status: IssueState::Closed,
                    created_at: Some(Utc.with_ymd_and_hms(2024, 6, 5, 9, 30, 0).unwrap()),
                    updated_at: Some(Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()),
                }),
            },
            Comment {
                id: "US-002".into(),
                body: "US".into(),
                comment_type: "ed".into(),
                comments: "Typo".into(),
                proposed_change: Some(String::new()),
                ..Comment::default()
            },
        ],
    }
}

#[test]
fn serialization_is_idempotent() {
    let sheet = sample_sheet();
    let first = interchange::to_yaml_string(&sheet, Some(DEFAULT_SCHEMA_REF)).unwrap();
    let decoded = interchange::from_yaml_str(&first).unwrap();
    assert_eq!(decoded, sheet);

    let second = interchange::to_yaml_string(&decoded, Some(DEFAULT_SCHEMA_REF)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_observations_are_dropped_on_write() {
    let mut sheet = sample_sheet();
    sheet.comments[1].observations = Some(String::new());

    let first = interchange::to_yaml_string(&sheet, None).unwrap();
    let decoded = interchange::from_yaml_str(&first).unwrap();
    assert_eq!(decoded.comments[1].observations, None);

    let second = interchange::to_yaml_string(&decoded, None).unwrap();
    assert_eq!(first, second);
    assert!(!second.contains("observations: ''"));
}

#[test]
fn nil_stage_is_still_written() {
    let sheet = CommentSheet::new(vec![Comment::new("US-001")]);
    let yaml = interchange::to_yaml_string(&sheet, None).unwrap();
    assert!(yaml.contains("stage: null"), "{yaml}");
    assert!(!yaml.contains("date:"));
    assert!(!yaml.contains("github:"));
}

#[test]
fn tracker_link_is_written_under_github_key() {
    let yaml = interchange::to_yaml_string(&sample_sheet(), None).unwrap();
    assert!(yaml.contains("github:"));
    assert!(yaml.contains("issue_number: 12"));
    assert!(yaml.contains("status: closed"));
}

#[test]
fn header_precedes_document() {
    let yaml = interchange::to_yaml_string(&sample_sheet(), Some(DEFAULT_SCHEMA_REF)).unwrap();
    assert!(yaml.starts_with("# yaml-language-server: $schema=schema/iso_comment_2012-03.yaml\n\n"));
}

#[test]
fn foreign_key_styles_are_normalized() {
    let yaml = r"
:version: '2012-03'
:stage: CD
:comments:
- :id: US-001
  :body: US
  :locality:
    :clause: '5.1'
    lineNumber: 42
  :type: te
  ProposedChange: Use SI units
  tracker_link:
    issue_number: 7
    issue_url: https://github.com/org/repo/issues/7
";
    let sheet = interchange::from_yaml_str(yaml).unwrap();
    assert_eq!(sheet.stage, Some(Stage::Cd));

    let comment = &sheet.comments[0];
    assert_eq!(comment.id, "US-001");
    assert_eq!(comment.locality.clause.as_deref(), Some("5.1"));
    assert_eq!(comment.locality.line_number.as_deref(), Some("42"));
    assert_eq!(comment.proposed_change.as_deref(), Some("Use SI units"));
    assert_eq!(comment.tracker_issue_number(), Some(7));
    assert_eq!(
        comment.tracker_link.as_ref().map(|link| link.status),
        Some(IssueState::Open)
    );
}

#[test]
fn link_without_issue_number_reads_as_unlinked() {
    let yaml = "
comments:
- id: US-001
  github: {}
- id: US-002
  github:
    issue_url: https://github.com/org/repo/issues/9
- id: US-003
  github:
- id: US-004
  github:
    issue_number: 4
";
    let sheet = interchange::from_yaml_str(yaml).unwrap();
    let numbers: Vec<Option<u64>> = sheet.comments.iter().map(|c| c.tracker_issue_number()).collect();
    assert_eq!(numbers, [None, None, None, Some(4)]);
    assert_eq!(sheet.linked_count(), 1);

    let rewritten = interchange::to_yaml_string(&sheet, None).unwrap();
    assert_eq!(rewritten.matches("github:").count(), 1);
}

#[test]
fn bare_comment_list_is_accepted() {
    let yaml = "
- id: US-001
  comments: First
- id: US-002
  comments: Second
";
    let sheet = interchange::from_yaml_str(yaml).unwrap();
    assert_eq!(sheet.version, "2012-03");
    let ids: Vec<_> = sheet.comments.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["US-001", "US-002"]);
}

#[test]
fn custom_and_blank_stages() {
    let custom = interchange::from_yaml_str("stage: CUSTOM\ncomments: []\n").unwrap();
    assert_eq!(custom.stage, Some(Stage::Custom("CUSTOM".into())));

    let blank = interchange::from_yaml_str("stage: ''\ncomments: []\n").unwrap();
    assert_eq!(blank.stage, None);
}

#[test]
fn read_and_write_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comments.yaml");

    let missing = interchange::read_sheet(&path).unwrap_err();
    assert!(matches!(missing, cmt_core::CoreError::FileNotFound { .. }));

    interchange::write_sheet(&path, &sample_sheet(), Some(DEFAULT_SCHEMA_REF)).unwrap();
    let loaded = interchange::read_sheet(&path).unwrap();
    assert_eq!(loaded, sample_sheet());
}
