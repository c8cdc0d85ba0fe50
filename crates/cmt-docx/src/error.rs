//! Document table error types.

use thiserror::Error;

/// Errors raised while reading or writing comment tables.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("No comments table found in document")]
    NoCommentsTable,

    /// The comments table has only a header row (or nothing at all).
    #[error("Comments table appears to be empty ({rows} row(s))")]
    EmptyCommentsTable { rows: usize },

    #[error("No table found in template")]
    NoTemplateTable,

    #[error("Template table must have at least one row")]
    EmptyTemplateTable,

    #[error("table {table} does not exist")]
    TableOutOfRange { table: usize },

    #[error("row {row} does not exist in table {table}")]
    RowOutOfRange { table: usize, row: usize },

    #[error("cell {cell} does not exist in row {row} of table {table}")]
    CellOutOfRange { table: usize, row: usize, cell: usize },

    /// The DOCX package could not be read or written.
    #[error("DOCX error: {0}")]
    Docx(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
