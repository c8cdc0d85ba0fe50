use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::subcommands::GithubCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Convert a DOCX comment sheet to YAML.
    Import(ImportArgs),
    /// Fill a DOCX template from YAML comments.
    Fill(FillArgs),
    /// GitHub issue synchronization.
    Github {
        #[command(subcommand)]
        action: GithubCommands,
    },
    /// Write or print the descriptive schema of the YAML file.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// DOCX comment sheet to read.
    pub input: PathBuf,
    /// YAML file to write.
    #[arg(short, long, default_value = "comments.yaml")]
    pub output: PathBuf,
    /// Leave the observations column out.
    #[arg(short, long)]
    pub exclude_observations: bool,
    /// Directory for the schema file referenced by the YAML header.
    #[arg(long, default_value = "schema")]
    pub schema_dir: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct FillArgs {
    /// YAML comments (a sheet or a bare list).
    pub input: PathBuf,
    /// DOCX file to write.
    #[arg(short, long, default_value = "filled_comments.docx")]
    pub output: PathBuf,
    /// DOCX template whose first table row is copied per comment.
    #[arg(short, long)]
    pub template: Option<PathBuf>,
    /// Shade the observations cell by disposition.
    #[arg(short, long)]
    pub shading: bool,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Write the schema file into this directory instead of printing it.
    #[arg(long)]
    pub dir: Option<PathBuf>,
}
