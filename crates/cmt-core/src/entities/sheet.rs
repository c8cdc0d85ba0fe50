use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::comment::Comment;
use crate::errors::CoreError;
use crate::scalar;
use crate::stage::{self, Stage};

/// Interchange format tag written into every sheet.
pub const FORMAT_VERSION: &str = "2012-03";

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

/// Ordered collection of comments plus review-round metadata.
///
/// Comment order is significant and preserved by every transformation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CommentSheet {
    #[serde(default = "default_version", deserialize_with = "scalar::string")]
    pub version: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::opt_string"
    )]
    pub date: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::opt_string"
    )]
    pub document: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::opt_string"
    )]
    pub project: Option<String>,
    /// Always written, as `null` when unset.
    #[serde(default, deserialize_with = "stage::deserialize_opt")]
    #[schemars(with = "Option<String>")]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Default for CommentSheet {
    fn default() -> Self {
        Self {
            version: default_version(),
            date: None,
            document: None,
            project: None,
            stage: None,
            comments: Vec::new(),
        }
    }
}

impl CommentSheet {
    #[must_use]
    pub fn new(comments: Vec<Comment>) -> Self {
        Self {
            comments,
            ..Self::default()
        }
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    #[must_use]
    pub fn find_comment(&self, id: &str) -> Option<&Comment> {
        self.comments.iter().find(|comment| comment.id == id)
    }

    pub fn find_comment_mut(&mut self, id: &str) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|comment| comment.id == id)
    }

    /// Number of comments that already have a tracker issue.
    #[must_use]
    pub fn linked_count(&self) -> usize {
        self.comments
            .iter()
            .filter(|comment| comment.has_tracker_issue())
            .count()
    }

    /// Check sheet-level invariants (unique comment ids).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateId`] for the first repeated id.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen = HashSet::with_capacity(self.comments.len());
        for comment in &self.comments {
            if !seen.insert(comment.id.as_str()) {
                return Err(CoreError::DuplicateId {
                    id: comment.id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sheet_uses_format_version() {
        let sheet = CommentSheet::default();
        assert_eq!(sheet.version, "2012-03");
        assert!(sheet.stage.is_none());
        assert!(sheet.comments.is_empty());
    }

    #[test]
    fn add_and_find_comment() {
        let mut sheet = CommentSheet::default();
        sheet.add_comment(Comment::new("US-001"));
        sheet.add_comment(Comment::new("US-002"));

        assert_eq!(sheet.comments.len(), 2);
        assert!(sheet.find_comment("US-002").is_some());
        assert!(sheet.find_comment("US-003").is_none());

        sheet.find_comment_mut("US-001").unwrap().comments = "edited".into();
        assert_eq!(sheet.comments[0].comments, "edited");
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let sheet = CommentSheet::new(vec![
            Comment::new("US-001"),
            Comment::new("US-002"),
            Comment::new("US-001"),
        ]);
        let err = sheet.validate().unwrap_err();
        assert!(matches!(err, CoreError::DuplicateId { ref id } if id == "US-001"));

        assert!(CommentSheet::new(vec![Comment::new("US-001")]).validate().is_ok());
    }
}
