//! The table-document capability consumed by the parser and the filler.

use crate::error::DocumentError;

/// Ordered tables of rows of cells, addressed by index.
///
/// Implementations keep the document in memory; persisting it is the
/// caller's job once all mutations are done.
pub trait TableStore {
    fn table_count(&self) -> usize;

    /// # Errors
    ///
    /// [`DocumentError::TableOutOfRange`] for an unknown table.
    fn row_count(&self, table: usize) -> Result<usize, DocumentError>;

    /// Plain text of every cell in a row; paragraphs are joined with `\n`.
    ///
    /// # Errors
    ///
    /// [`DocumentError::TableOutOfRange`] or [`DocumentError::RowOutOfRange`].
    fn row_texts(&self, table: usize, row: usize) -> Result<Vec<String>, DocumentError>;

    /// All text of the document (body paragraphs and table cells), one
    /// paragraph per line.
    fn full_text(&self) -> String;

    /// Insert a copy of row `source` at position `before`.
    ///
    /// # Errors
    ///
    /// [`DocumentError::TableOutOfRange`] or [`DocumentError::RowOutOfRange`].
    fn copy_row_before(
        &mut self,
        table: usize,
        source: usize,
        before: usize,
    ) -> Result<(), DocumentError>;

    /// Replace the text of the first run that has text. A cell without any
    /// text gets a new run in its first paragraph. Empty `text` only clears
    /// existing text.
    ///
    /// # Errors
    ///
    /// Any out-of-range error for the addressed cell.
    fn set_cell_text(
        &mut self,
        table: usize,
        row: usize,
        cell: usize,
        text: &str,
    ) -> Result<(), DocumentError>;

    /// Set the background fill of a cell to a hex color such as `92D050`.
    ///
    /// # Errors
    ///
    /// Any out-of-range error for the addressed cell.
    fn shade_cell(
        &mut self,
        table: usize,
        row: usize,
        cell: usize,
        fill: &str,
    ) -> Result<(), DocumentError>;

    /// # Errors
    ///
    /// [`DocumentError::TableOutOfRange`] or [`DocumentError::RowOutOfRange`].
    fn remove_row(&mut self, table: usize, row: usize) -> Result<(), DocumentError>;
}
