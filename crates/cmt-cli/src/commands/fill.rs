use std::path::PathBuf;

use anyhow::{Context, bail};
use cmt_core::interchange;
use cmt_docx::{DocxDocument, FillOptions, SkippedRow, fill_table};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::FillArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct FillResponse {
    input: PathBuf,
    output: PathBuf,
    template: Option<PathBuf>,
    filled: usize,
    skipped: Vec<SkippedRow>,
}

/// Handle `commenter fill`.
pub fn handle(args: &FillArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let sheet = interchange::read_sheet(&args.input)?;
    if sheet.comments.is_empty() {
        bail!("No comments found in YAML file {}", args.input.display());
    }

    let mut document = match &args.template {
        Some(path) => DocxDocument::open(path)
            .with_context(|| format!("failed to open template {}", path.display()))?,
        None => DocxDocument::comment_template(),
    };
    let options = FillOptions {
        shading: args.shading,
    };
    let report = fill_table(&mut document, &sheet.comments, &options)?;
    document
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    output(
        &FillResponse {
            input: args.input.clone(),
            output: args.output.clone(),
            template: args.template.clone(),
            filled: report.filled.len(),
            skipped: report.skipped,
        },
        flags,
    )
}
