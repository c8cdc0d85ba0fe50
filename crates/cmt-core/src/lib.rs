//! # cmt-core
//!
//! Core types, interchange format, and error types for commenter.
//!
//! This crate provides the foundational types shared across all commenter crates:
//! - Entity structs for the review record ([`Comment`], [`CommentSheet`], locality, tracker link)
//! - The review [`Stage`] enumeration
//! - YAML interchange reading/writing with key normalization
//! - Descriptive JSON Schema generation for the interchange file
//! - Cross-cutting error types

pub mod entities;
pub mod errors;
pub mod interchange;
pub mod schema;
pub mod stage;

mod scalar;

pub use entities::{Comment, CommentSheet, FORMAT_VERSION, IssueState, Locality, TrackerLink};
pub use errors::CoreError;
pub use stage::Stage;
