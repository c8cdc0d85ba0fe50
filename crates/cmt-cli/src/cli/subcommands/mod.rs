pub mod github;

pub use github::GithubCommands;
