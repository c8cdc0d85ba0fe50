//! # cmt-docx
//!
//! Comment tables in word-processing documents for commenter.
//!
//! - [`TableStore`]: the table capability the parser and filler work over,
//!   with an in-memory ([`MemoryDocument`]) and a DOCX ([`DocxDocument`])
//!   implementation
//! - [`parse_sheet`]: comments table → `CommentSheet`
//! - [`fill_table`]: comments → rows copied from a template row
//! - [`shading_for`]: disposition colors for the observations cell

pub mod docx;
pub mod filler;
pub mod memory;
pub mod parser;
pub mod shading;

mod error;
mod store;

pub use docx::{COMMENT_COLUMNS, DocxDocument};
pub use error::DocumentError;
pub use filler::{FillOptions, FillReport, SkippedRow, fill_table};
pub use memory::MemoryDocument;
pub use parser::{ParseOptions, SheetMetadata, extract_metadata, parse_sheet};
pub use shading::{ShadingColor, shading_for};
pub use store::TableStore;
