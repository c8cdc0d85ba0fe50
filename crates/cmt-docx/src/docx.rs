//! [`TableStore`] over a `.docx` package, backed by `docx-rs`.

use std::io::Cursor;
use std::path::Path;

use docx_rs::{
    read_docx, Docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild, Shading, Table,
    TableCell, TableCellContent, TableChild, TableRow, TableRowChild,
};

use crate::error::DocumentError;
use crate::store::TableStore;

/// Number of columns in a comment sheet row.
pub const COMMENT_COLUMNS: usize = 8;

/// A DOCX document held in memory.
///
/// Mutations go through [`TableStore`]; [`DocxDocument::save`] packs the
/// result once at the end.
#[derive(Debug)]
pub struct DocxDocument {
    docx: Docx,
}

impl DocxDocument {
    /// Read a `.docx` file.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Io`] when the file cannot be read and
    /// [`DocumentError::Docx`] when it is not a valid package.
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// # Errors
    ///
    /// [`DocumentError::Docx`] when the bytes are not a valid package.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let docx = read_docx(bytes).map_err(|e| DocumentError::Docx(e.to_string()))?;
        Ok(Self { docx })
    }

    /// A blank document with one table holding one empty eight-cell row,
    /// usable as a fill template.
    #[must_use]
    pub fn comment_template() -> Self {
        let cells = (0..COMMENT_COLUMNS)
            .map(|_| TableCell::new().add_paragraph(Paragraph::new()))
            .collect();
        let table = Table::new(vec![TableRow::new(cells)]);
        Self {
            docx: Docx::new().add_table(table),
        }
    }

    /// Pack the document and write it to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Docx`] when packing fails, [`DocumentError::Io`] when
    /// the file cannot be written.
    pub fn save(self, path: &Path) -> Result<(), DocumentError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// # Errors
    ///
    /// [`DocumentError::Docx`] when packing fails.
    pub fn to_bytes(self) -> Result<Vec<u8>, DocumentError> {
        let mut buffer = Cursor::new(Vec::new());
        self.docx
            .build()
            .pack(&mut buffer)
            .map_err(|e| DocumentError::Docx(e.to_string()))?;
        Ok(buffer.into_inner())
    }

    fn tables(&self) -> impl Iterator<Item = &Table> {
        self.docx.document.children.iter().filter_map(|child| match child {
            DocumentChild::Table(table) => {
                let table: &Table = table;
                Some(table)
            }
            _ => None,
        })
    }

    fn table(&self, index: usize) -> Result<&Table, DocumentError> {
        self.tables()
            .nth(index)
            .ok_or(DocumentError::TableOutOfRange { table: index })
    }

    fn table_mut(&mut self, index: usize) -> Result<&mut Table, DocumentError> {
        self.docx
            .document
            .children
            .iter_mut()
            .filter_map(|child| match child {
                DocumentChild::Table(table) => {
                    let table: &mut Table = table;
                    Some(table)
                }
                _ => None,
            })
            .nth(index)
            .ok_or(DocumentError::TableOutOfRange { table: index })
    }

    fn row(&self, table: usize, row: usize) -> Result<&TableRow, DocumentError> {
        self.table(table)?
            .rows
            .get(row)
            .map(|TableChild::TableRow(r)| r)
            .ok_or(DocumentError::RowOutOfRange { table, row })
    }

    fn cell_mut(
        &mut self,
        table: usize,
        row: usize,
        cell: usize,
    ) -> Result<&mut TableCell, DocumentError> {
        let TableChild::TableRow(table_row) = self
            .table_mut(table)?
            .rows
            .get_mut(row)
            .ok_or(DocumentError::RowOutOfRange { table, row })?;
        table_row
            .cells
            .get_mut(cell)
            .map(|TableRowChild::TableCell(c)| c)
            .ok_or(DocumentError::CellOutOfRange { table, row, cell })
    }
}

fn run_text(run: &Run) -> String {
    run.children
        .iter()
        .filter_map(|child| match child {
            RunChild::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect()
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    paragraph
        .children
        .iter()
        .filter_map(|child| match child {
            ParagraphChild::Run(run) => Some(run_text(run)),
            _ => None,
        })
        .collect()
}

fn cell_paragraphs(cell: &TableCell) -> impl Iterator<Item = &Paragraph> {
    cell.children.iter().filter_map(|content| match content {
        TableCellContent::Paragraph(paragraph) => Some(paragraph.as_ref()),
        _ => None,
    })
}

fn cell_text(cell: &TableCell) -> String {
    cell_paragraphs(cell)
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Overwrite the first run carrying text. Returns `false` when the cell has
/// no such run.
fn replace_first_text_run(cell: &mut TableCell, text: &str) -> bool {
    for content in &mut cell.children {
        let TableCellContent::Paragraph(paragraph) = content else {
            continue;
        };
        for child in &mut paragraph.children {
            let ParagraphChild::Run(run) = child else {
                continue;
            };
            let run: &mut Run = run;
            if run_text(run).is_empty() {
                continue;
            }
            let mut first = true;
            for run_child in &mut run.children {
                if let RunChild::Text(t) = run_child {
                    t.text = if first { text.to_string() } else { String::new() };
                    first = false;
                }
            }
            return true;
        }
    }
    false
}

fn append_run(cell: &mut TableCell, text: &str) {
    let run = Run::new().add_text(text);
    let first_paragraph = cell
        .children
        .iter_mut()
        .find_map(|content| match content {
            TableCellContent::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        });
    match first_paragraph {
        Some(paragraph) => paragraph.children.push(ParagraphChild::Run(Box::new(run))),
        None => cell
            .children
            .push(TableCellContent::Paragraph(Box::new(Paragraph::new().add_run(run)))),
    }
}

impl TableStore for DocxDocument {
    fn table_count(&self) -> usize {
        self.tables().count()
    }

    fn row_count(&self, table: usize) -> Result<usize, DocumentError> {
        Ok(self.table(table)?.rows.len())
    }

    fn row_texts(&self, table: usize, row: usize) -> Result<Vec<String>, DocumentError> {
        Ok(self
            .row(table, row)?
            .cells
            .iter()
            .map(|TableRowChild::TableCell(cell)| cell_text(cell))
            .collect())
    }

    fn full_text(&self) -> String {
        let mut lines = Vec::new();
        for child in &self.docx.document.children {
            match child {
                DocumentChild::Paragraph(paragraph) => lines.push(paragraph_text(paragraph)),
                DocumentChild::Table(table) => {
                    let table: &Table = table;
                    for TableChild::TableRow(row) in &table.rows {
                        for TableRowChild::TableCell(cell) in &row.cells {
                            lines.extend(cell_paragraphs(cell).map(paragraph_text));
                        }
                    }
                }
                _ => {}
            }
        }
        lines.join("\n")
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
        let cell = self.cell_mut(table, row, cell)?;
        if !replace_first_text_run(cell, text) && !text.is_empty() {
            append_run(cell, text);
        }
        Ok(())
    }

    fn shade_cell(
        &mut self,
        table: usize,
        row: usize,
        cell: usize,
        fill: &str,
    ) -> Result<(), DocumentError> {
        let cell = self.cell_mut(table, row, cell)?;
        let current = std::mem::replace(cell, TableCell::new());
        *cell = current.shading(Shading::new().color("auto").fill(fill));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_template_has_one_blank_row() {
        let doc = DocxDocument::comment_template();
        assert_eq!(doc.table_count(), 1);
        assert_eq!(doc.row_count(0).unwrap(), 1);
        assert_eq!(doc.row_texts(0, 0).unwrap(), vec![String::new(); COMMENT_COLUMNS]);
    }

    #[test]
    fn set_cell_text_fills_blank_cell_then_replaces() {
        let mut doc = DocxDocument::comment_template();
        doc.set_cell_text(0, 0, 2, "5.1").unwrap();
        assert_eq!(doc.row_texts(0, 0).unwrap()[2], "5.1");

        doc.set_cell_text(0, 0, 2, "6.2").unwrap();
        assert_eq!(doc.row_texts(0, 0).unwrap()[2], "6.2");

        doc.set_cell_text(0, 0, 2, "").unwrap();
        assert_eq!(doc.row_texts(0, 0).unwrap()[2], "");
    }

    #[test]
    fn text_lands_in_cells_with_and_without_paragraphs() {
        let row = TableRow::new(vec![
            TableCell::new(),
            TableCell::new().add_paragraph(Paragraph::new()),
        ]);
        let mut doc = DocxDocument {
            docx: Docx::new().add_table(Table::new(vec![row])),
        };

        doc.set_cell_text(0, 0, 0, "US-001").unwrap();
        doc.set_cell_text(0, 0, 1, "Clause 5").unwrap();

        assert_eq!(doc.row_texts(0, 0).unwrap(), vec!["US-001", "Clause 5"]);
        assert!(doc.full_text().contains("Clause 5"));

        let reread = DocxDocument::from_bytes(&doc.to_bytes().unwrap()).unwrap();
        assert_eq!(reread.row_texts(0, 0).unwrap(), vec!["US-001", "Clause 5"]);
    }

    #[test]
    fn out_of_range_cell_is_an_error() {
        let mut doc = DocxDocument::comment_template();
        assert!(matches!(
            doc.set_cell_text(0, 0, COMMENT_COLUMNS, "x"),
            Err(DocumentError::CellOutOfRange { .. })
        ));
        assert!(matches!(
            doc.shade_cell(1, 0, 0, "92D050"),
            Err(DocumentError::TableOutOfRange { table: 1 })
        ));
    }

    #[test]
    fn packs_and_reads_back() {
        let mut doc = DocxDocument::comment_template();
        doc.copy_row_before(0, 0, 0).unwrap();
        doc.set_cell_text(0, 0, 0, "US-001").unwrap();
        doc.set_cell_text(0, 0, 5, "Fix the symbol").unwrap();

        let bytes = doc.to_bytes().unwrap();
        let reread = DocxDocument::from_bytes(&bytes).unwrap();
        assert_eq!(reread.row_count(0).unwrap(), 2);
        let texts = reread.row_texts(0, 0).unwrap();
        assert_eq!(texts[0], "US-001");
        assert_eq!(texts[5], "Fix the symbol");
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = DocxDocument::open(&dir.path().join("missing.docx"));
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }
}
