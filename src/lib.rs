//! This is the library of changebot, a bot that warns about and closes stale pull requests.
pub mod bot;
pub mod config;
pub mod github;
pub mod utils;

pub use bot::{create_sweep_process, process_prs, SweepProcess, SweepRequest};
pub use config::StalePrsConfig;
pub use github::api::{create_github_client, GithubAppClient};
pub use github::server::{create_app, ServerState};
pub use github::CronToken;
