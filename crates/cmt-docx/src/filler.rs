//! Export: comments → rows of a template table.

use cmt_core::Comment;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::DocumentError;
use crate::shading::shading_for;
use crate::store::TableStore;

const TEMPLATE_TABLE: usize = 0;
const OBSERVATIONS_CELL: usize = 7;

#[derive(Debug, Clone, Copy, Default)]
pub struct FillOptions {
    /// Color the observations cell by disposition.
    pub shading: bool,
}

/// A comment that could not be written into the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub comment_id: String,
    pub reason: String,
}

/// Outcome of [`fill_table`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    pub filled: Vec<String>,
    pub skipped: Vec<SkippedRow>,
}

/// Cell values of a comment in column order. Absent values are empty.
fn cell_values(comment: &Comment) -> [&str; 8] {
    let locality = &comment.locality;
    [
        comment.id.as_str(),
        locality.line_number.as_deref().unwrap_or_default(),
        locality.clause.as_deref().unwrap_or_default(),
        locality.element.as_deref().unwrap_or_default(),
        comment.comment_type.as_str(),
        comment.comments.as_str(),
        comment.proposed_change.as_deref().unwrap_or_default(),
        comment.observations.as_deref().unwrap_or_default(),
    ]
}

fn write_row(
    store: &mut impl TableStore,
    row: usize,
    comment: &Comment,
    options: &FillOptions,
) -> Result<(), DocumentError> {
    for (cell, value) in cell_values(comment).into_iter().enumerate() {
        if value.is_empty() {
            continue;
        }
        store.set_cell_text(TEMPLATE_TABLE, row, cell, value)?;
        if cell == OBSERVATIONS_CELL
            && options.shading
            && let Some(color) = shading_for(value)
        {
            store.shade_cell(TEMPLATE_TABLE, row, cell, color.fill())?;
        }
    }
    Ok(())
}

/// Render `comments` into the first table of `store`, in order.
///
/// The first row of the table is the row template: each comment gets a
/// copy inserted just before it, and the template row is dropped once all
/// comments are in. A comment whose row cannot be written is skipped and
/// its partial row removed.
///
/// # Errors
///
/// [`DocumentError::NoTemplateTable`] or [`DocumentError::EmptyTemplateTable`]
/// when the store has nothing to copy from, or any store error raised while
/// removing the template row.
pub fn fill_table(
    store: &mut impl TableStore,
    comments: &[Comment],
    options: &FillOptions,
) -> Result<FillReport, DocumentError> {
    if store.table_count() == 0 {
        return Err(DocumentError::NoTemplateTable);
    }
    if store.row_count(TEMPLATE_TABLE)? == 0 {
        return Err(DocumentError::EmptyTemplateTable);
    }

    let mut template_row = 0;
    let mut report = FillReport::default();

    for comment in comments {
        if let Err(e) = store.copy_row_before(TEMPLATE_TABLE, template_row, template_row) {
            warn!(comment = %comment.id, error = %e, "could not add row");
            report.skipped.push(SkippedRow {
                comment_id: comment.id.clone(),
                reason: e.to_string(),
            });
            continue;
        }
        let row = template_row;
        template_row += 1;

        match write_row(store, row, comment, options) {
            Ok(()) => report.filled.push(comment.id.clone()),
            Err(e) => {
                warn!(comment = %comment.id, error = %e, "could not fill row, removing it");
                if store.remove_row(TEMPLATE_TABLE, row).is_ok() {
                    template_row -= 1;
                }
                report.skipped.push(SkippedRow {
                    comment_id: comment.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    store.remove_row(TEMPLATE_TABLE, template_row)?;
    info!(
        filled = report.filled.len(),
        skipped = report.skipped.len(),
        "filled comment table"
    );
    Ok(report)
}
