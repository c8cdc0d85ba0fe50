use std::path::Path;

use anyhow::Context;
use cmt_config::{CommenterConfig, MilestoneRef};
use cmt_core::Stage;
use cmt_sync::{
    BatchSummary, CreateOptions, CreateResult, IssueSynchronizer, IssueTemplates,
    ObservationRetriever, RetrieveOptions, RetrieveResult,
};
use cmt_tracker::GithubClient;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::GithubCommands;
use crate::cli::subcommands::github::{CreateArgs, RetrieveArgs};
use crate::output::output;

#[derive(Debug, Serialize)]
struct CreateResponse {
    dry_run: bool,
    results: Vec<CreateResult>,
    summary: BatchSummary,
}

#[derive(Debug, Serialize)]
struct RetrieveResponse {
    dry_run: bool,
    results: Vec<RetrieveResult>,
    summary: BatchSummary,
}

/// Handle `commenter github ...`.
pub async fn handle(action: &GithubCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        GithubCommands::Create(args) => create(args, flags).await,
        GithubCommands::Retrieve(args) => retrieve(args, flags).await,
    }
}

fn connect(config: &CommenterConfig) -> anyhow::Result<GithubClient> {
    let github = &config.github;
    github.ensure_ready()?;
    GithubClient::new(&github.api_url, &github.repository, &github.token)
        .context("failed to build GitHub client")
}

fn load_config(path: &Path) -> anyhow::Result<CommenterConfig> {
    CommenterConfig::load_with_dotenv(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

async fn create(args: &CreateArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let client = connect(&config)?;
    let templates = IssueTemplates::load(args.title_template.as_deref(), args.body_template.as_deref())?;
    let synchronizer = IssueSynchronizer::new(&client, &config.github, templates)?;

    let options = CreateOptions {
        stage: args.stage.as_deref().map(Stage::parse),
        assignee: args.assignee.clone(),
        milestone: args.milestone.as_deref().map(MilestoneRef::parse),
        dry_run: args.dry_run,
    };
    let results = synchronizer
        .sync_file(&args.input, args.output.as_deref(), &options)
        .await?;

    output(
        &CreateResponse {
            dry_run: args.dry_run,
            summary: BatchSummary::of_created(&results),
            results,
        },
        flags,
    )
}

async fn retrieve(args: &RetrieveArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let client = connect(&config)?;
    let retriever = ObservationRetriever::new(&client, &config.github.retrieval);

    let options = RetrieveOptions {
        include_open: args.include_open,
        dry_run: args.dry_run,
    };
    let results = retriever
        .retrieve_file(&args.input, args.output.as_deref(), &options)
        .await?;

    output(
        &RetrieveResponse {
            dry_run: args.dry_run,
            summary: BatchSummary::of_retrieved(&results),
            results,
        },
        flags,
    )
}
