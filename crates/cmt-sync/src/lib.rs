//! # cmt-sync
//!
//! Synchronization between comment sheets and an issue tracker.
//!
//! - [`IssueSynchronizer`]: creates one issue per comment and records the
//!   link on the comment
//! - [`ObservationRetriever`]: reads dispositions back from issue threads
//! - [`LiquidEngine`]: the Liquid engine for issue titles and bodies
//!
//! Both entry points take `&mut CommentSheet` and mutate it in place; the
//! `*_file` variants own the read-once/write-once cycle of the interchange
//! file.

pub mod creator;
pub mod observation;
pub mod plan;
pub mod retriever;
pub mod summary;
pub mod template;
pub mod variables;

mod error;

pub use creator::{CreateOptions, CreateOutcome, CreateResult, IssuePreview, IssueSynchronizer};
pub use error::SyncError;
pub use observation::{find_observation, select_observation};
pub use retriever::{ObservationRetriever, RetrieveOptions, RetrieveOutcome, RetrieveResult};
pub use summary::BatchSummary;
pub use template::{
    IssueTemplates, LiquidEngine, TemplateEngine, TemplateError, TemplateValue, TemplateVariables,
};
pub use variables::{expand_comment_type, template_variables};
