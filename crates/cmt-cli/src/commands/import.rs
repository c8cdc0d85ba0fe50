use std::path::PathBuf;

use anyhow::Context;
use cmt_core::interchange::{self, SCHEMA_FILE_NAME};
use cmt_core::schema;
use cmt_docx::{DocxDocument, ParseOptions, parse_sheet};
use serde::Serialize;
use tracing::warn;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ImportResponse {
    input: PathBuf,
    output: PathBuf,
    schema: PathBuf,
    comments: usize,
    date: Option<String>,
    document: Option<String>,
    project: Option<String>,
}

/// Handle `commenter import`.
pub fn handle(args: &ImportArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let document = DocxDocument::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let options = ParseOptions {
        exclude_observations: args.exclude_observations,
    };
    let sheet = parse_sheet(&document, &options)?;
    if let Err(error) = sheet.validate() {
        warn!(%error, "imported sheet has duplicate comment ids");
    }

    let schema_path = schema::write_schema(&args.schema_dir)
        .with_context(|| format!("failed to write schema into {}", args.schema_dir.display()))?;
    let schema_ref = args.schema_dir.join(SCHEMA_FILE_NAME);
    interchange::write_sheet(&args.output, &sheet, Some(&schema_ref.to_string_lossy()))
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    output(
        &ImportResponse {
            input: args.input.clone(),
            output: args.output.clone(),
            schema: schema_path,
            comments: sheet.comments.len(),
            date: sheet.date,
            document: sheet.document,
            project: sheet.project,
        },
        flags,
    )
}
