//! Import: comment table → [`CommentSheet`].

use std::sync::LazyLock;

use cmt_core::{Comment, CommentSheet, FORMAT_VERSION, Locality};
use regex::Regex;
use tracing::{debug, info};

use crate::error::DocumentError;
use crate::store::TableStore;

/// Options for [`parse_sheet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Leave the observations column out of the parsed comments.
    pub exclude_observations: bool,
}

/// Sheet-level metadata found in the document text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetMetadata {
    pub date: Option<String>,
    pub document: Option<String>,
    pub project: Option<String>,
}

static DATE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Date:\s*([0-9]{4}-[0-9]{2}-[0-9]{2})").ok());
static DOCUMENT_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Document:\s*([A-Z][A-Za-z/]*\s+[0-9][0-9\-:.]*)").ok());
static PROJECT_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Project:\s*([^\n\r]+)").ok());

fn capture(re: &LazyLock<Option<Regex>>, text: &str) -> Option<String> {
    let re = re.as_ref()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Each field is looked up independently; a miss leaves it `None`.
#[must_use]
pub fn extract_metadata(text: &str) -> SheetMetadata {
    SheetMetadata {
        date: capture(&DATE_RE, text),
        document: capture(&DOCUMENT_RE, text),
        project: capture(&PROJECT_RE, text),
    }
}

/// Index of the table holding the comments: the second table when the
/// document has a metadata table in front, otherwise the first.
fn comments_table_index(store: &impl TableStore) -> Option<usize> {
    match store.table_count() {
        0 => None,
        1 => Some(0),
        _ => Some(1),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn row_to_comment(cells: &[String], options: &ParseOptions) -> Comment {
    let cell = |i: usize| cells.get(i).map_or("", String::as_str);
    let mut comment = Comment::new(cell(0));
    comment.locality = Locality {
        line_number: non_empty(cell(1)),
        clause: non_empty(cell(2)),
        element: non_empty(cell(3)),
    };
    comment.comment_type = cell(4).to_string();
    comment.comments = cell(5).to_string();
    comment.proposed_change = Some(cell(6).to_string());
    if !options.exclude_observations {
        comment.observations = non_empty(cell(7));
    }
    comment
}

/// Read every non-blank row of the comments table into a new sheet.
///
/// Header rows are not detected; they come through like any other row.
/// Empty locality and observation cells become `None`, while empty type,
/// comment and proposed-change cells stay as empty strings.
///
/// # Errors
///
/// [`DocumentError::NoCommentsTable`] when the document has no table,
/// [`DocumentError::EmptyCommentsTable`] when the table has fewer than two
/// rows.
pub fn parse_sheet(
    store: &impl TableStore,
    options: &ParseOptions,
) -> Result<CommentSheet, DocumentError> {
    let table = comments_table_index(store).ok_or(DocumentError::NoCommentsTable)?;
    let rows = store.row_count(table)?;
    if rows < 2 {
        return Err(DocumentError::EmptyCommentsTable { rows });
    }

    let mut comments = Vec::with_capacity(rows);
    for row in 0..rows {
        let cells: Vec<String> = store
            .row_texts(table, row)?
            .iter()
            .map(|text| text.trim().to_string())
            .collect();
        if cells.iter().all(String::is_empty) {
            debug!(row, "skipping blank row");
            continue;
        }
        comments.push(row_to_comment(&cells, options));
    }

    let metadata = extract_metadata(&store.full_text());
    info!(table, comments = comments.len(), "parsed comments table");

    Ok(CommentSheet {
        version: FORMAT_VERSION.to_string(),
        date: metadata.date,
        document: metadata.document,
        project: metadata.project,
        stage: None,
        comments,
    })
}
