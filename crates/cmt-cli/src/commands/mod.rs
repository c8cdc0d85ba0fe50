pub mod fill;
pub mod github;
pub mod import;
pub mod schema;

use crate::cli::{Commands, GlobalFlags};

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Import(args) => import::handle(&args, flags),
        Commands::Fill(args) => fill::handle(&args, flags),
        Commands::Github { action } => github::handle(&action, flags).await,
        Commands::Schema(args) => schema::handle(&args, flags),
    }
}
