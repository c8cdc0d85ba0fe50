//! Entity structs for the review record.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`. Field
//! order here is the field order of the interchange file.

mod comment;
mod sheet;
mod tracker_link;

pub use comment::{BRIEF_SUMMARY_LEN, Comment, Locality};
pub use sheet::{CommentSheet, FORMAT_VERSION};
pub use tracker_link::{IssueState, TrackerLink};
