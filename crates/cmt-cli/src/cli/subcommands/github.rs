use std::path::PathBuf;

use clap::{Args, Subcommand};

/// GitHub issue commands.
#[derive(Clone, Debug, Subcommand)]
pub enum GithubCommands {
    /// Create one issue per comment and link it in the YAML file.
    Create(CreateArgs),
    /// Pull observations from closed issues back into the YAML file.
    Retrieve(RetrieveArgs),
}

#[derive(Clone, Debug, Args)]
pub struct CreateArgs {
    /// YAML comment file.
    pub input: PathBuf,
    /// GitHub configuration file (YAML or TOML).
    #[arg(short, long)]
    pub config: PathBuf,
    /// Write the updated YAML here instead of over the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Custom issue title template.
    #[arg(long)]
    pub title_template: Option<PathBuf>,
    /// Custom issue body template.
    #[arg(long)]
    pub body_template: Option<PathBuf>,
    /// Stage to use instead of the one in the file (WD, CD, DIS, ...).
    #[arg(long)]
    pub stage: Option<String>,
    /// Assign issues to this login.
    #[arg(long)]
    pub assignee: Option<String>,
    /// Milestone number or exact title.
    #[arg(long)]
    pub milestone: Option<String>,
    /// Show what would be created without touching GitHub or the file.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Debug, Args)]
pub struct RetrieveArgs {
    /// YAML comment file.
    pub input: PathBuf,
    /// GitHub configuration file (YAML or TOML).
    #[arg(short, long)]
    pub config: PathBuf,
    /// Write the updated YAML here instead of over the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Also read issues that are still open.
    #[arg(long)]
    pub include_open: bool,
    /// Show what would be retrieved without changing the file.
    #[arg(long)]
    pub dry_run: bool,
}
