//! In-memory table document.
//!
//! Mirrors the paragraph/run structure of a word-processing cell closely
//! enough that run-level substitution behaves like it does on a DOCX file.

use crate::error::DocumentError;
use crate::store::TableStore;

/// A cell: paragraphs of runs, plus an optional background fill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCell {
    pub paragraphs: Vec<Vec<String>>,
    pub shading: Option<String>,
}

impl MemoryCell {
    /// Cell with a single paragraph holding a single run.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            paragraphs: vec![vec![text.to_string()]],
            shading: None,
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|runs| runs.concat())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn set_text(&mut self, text: &str) {
        if let Some(run) = self
            .paragraphs
            .iter_mut()
            .flatten()
            .find(|run| !run.is_empty())
        {
            text.clone_into(run);
            return;
        }
        if text.is_empty() {
            return;
        }
        match self.paragraphs.first_mut() {
            Some(runs) => runs.push(text.to_string()),
            None => self.paragraphs.push(vec![text.to_string()]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRow {
    pub cells: Vec<MemoryCell>,
}

impl MemoryRow {
    #[must_use]
    pub fn from_texts(texts: &[&str]) -> Self {
        Self {
            cells: texts.iter().map(|text| MemoryCell::with_text(text)).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTable {
    pub rows: Vec<MemoryRow>,
}

/// Body paragraphs followed by tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    pub paragraphs: Vec<String>,
    pub tables: Vec<MemoryTable>,
}

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_paragraph(mut self, text: &str) -> Self {
        self.paragraphs.push(text.to_string());
        self
    }

    /// Append a table whose cells each hold one run of text.
    #[must_use]
    pub fn with_table(mut self, rows: &[&[&str]]) -> Self {
        self.tables.push(MemoryTable {
            rows: rows.iter().map(|texts| MemoryRow::from_texts(texts)).collect(),
        });
        self
    }

    fn table(&self, table: usize) -> Result<&MemoryTable, DocumentError> {
        self.tables
            .get(table)
            .ok_or(DocumentError::TableOutOfRange { table })
    }

    fn table_mut(&mut self, table: usize) -> Result<&mut MemoryTable, DocumentError> {
        self.tables
            .get_mut(table)
            .ok_or(DocumentError::TableOutOfRange { table })
    }

    fn row(&self, table: usize, row: usize) -> Result<&MemoryRow, DocumentError> {
        self.table(table)?
            .rows
            .get(row)
            .ok_or(DocumentError::RowOutOfRange { table, row })
    }

    /// Borrow a cell for inspection.
    ///
    /// # Errors
    ///
    /// Any out-of-range error for the addressed cell.
    pub fn cell(&self, table: usize, row: usize, cell: usize) -> Result<&MemoryCell, DocumentError> {
        self.row(table, row)?
            .cells
            .get(cell)
            .ok_or(DocumentError::CellOutOfRange { table, row, cell })
    }

    fn cell_mut(
        &mut self,
        table: usize,
        row: usize,
        cell: usize,
    ) -> Result<&mut MemoryCell, DocumentError> {
        self.table_mut(table)?
            .rows
            .get_mut(row)
            .ok_or(DocumentError::RowOutOfRange { table, row })?
            .cells
            .get_mut(cell)
            .ok_or(DocumentError::CellOutOfRange { table, row, cell })
    }
}

impl TableStore for MemoryDocument {
    fn table_count(&self) -> usize {
        self.tables.len()
    }

    fn row_count(&self, table: usize) -> Result<usize, DocumentError> {
        Ok(self.table(table)?.rows.len())
    }

    fn row_texts(&self, table: usize, row: usize) -> Result<Vec<String>, DocumentError> {
        Ok(self.row(table, row)?.cells.iter().map(MemoryCell::text).collect())
    }

    fn full_text(&self) -> String {
        let cells = self
            .tables
            .iter()
            .flat_map(|table| &table.rows)
            .flat_map(|row| &row.cells)
            .map(MemoryCell::text);
        self.paragraphs
            .iter()
            .cloned()
            .chain(cells)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn copy_row_before(
        &mut self,
        table: usize,
        source: usize,
        before: usize,
    ) -> Result<(), DocumentError> {
        let rows = &mut self.table_mut(table)?.rows;
        let copy = rows
            .get(source)
            .cloned()
            .ok_or(DocumentError::RowOutOfRange { table, row: source })?;
        if before > rows.len() {
            return Err(DocumentError::RowOutOfRange { table, row: before });
        }
        rows.insert(before, copy);
        Ok(())
    }

    fn set_cell_text(
        &mut self,
        table: usize,
        row: usize,
        cell: usize,
        text: &str,
    ) -> Result<(), DocumentError> {
        self.cell_mut(table, row, cell)?.set_text(text);
        Ok(())
    }

    fn shade_cell(
        &mut self,
        table: usize,
        row: usize,
        cell: usize,
        fill: &str,
    ) -> Result<(), DocumentError> {
        self.cell_mut(table, row, cell)?.shading = Some(fill.to_string());
        Ok(())
    }

    fn remove_row(&mut self, table: usize, row: usize) -> Result<(), DocumentError> {
        let rows = &mut self.table_mut(table)?.rows;
        if row >= rows.len() {
            return Err(DocumentError::RowOutOfRange { table, row });
        }
        rows.remove(row);
        Ok(())
    }
}
