use anyhow::Context;
use octocrab::models::{AppId, InstallationId};
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretVec};

use client::GithubRepositoryClient;

use crate::bot::RepositoryLoader;
use crate::github::GithubRepoName;

pub mod client;

pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";

/// Creates an octocrab client authenticated as the GitHub app with the given ID.
pub fn create_github_client(
    app_id: AppId,
    github_url: String,
    private_key: SecretVec<u8>,
) -> anyhow::Result<Octocrab> {
    let key = jsonwebtoken::EncodingKey::from_rsa_pem(private_key.expose_secret().as_ref())
        .context("Could not encode private key")?;

    Octocrab::builder()
        .base_uri(github_url)?
        .app(app_id, key)
        .build()
        .context("Could not create octocrab builder")
}

/// Provides access to repositories of the installations of the bot's GitHub app.
pub struct GithubAppClient {
    client: Octocrab,
}

impl GithubAppClient {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

impl RepositoryLoader for GithubAppClient {
    type Client = GithubRepositoryClient;

    /// The returned client caches the installation access token and refreshes it once it
    /// expires.
    fn load_repository(
        &self,
        repository: &str,
        installation: &str,
    ) -> anyhow::Result<GithubRepositoryClient> {
        let repo_name: GithubRepoName = repository.parse()?;
        let installation: u64 = installation
            .parse()
            .with_context(|| format!("Invalid installation id `{installation}`"))?;

        Ok(GithubRepositoryClient {
            client: self.client.installation(InstallationId(installation)),
            repo_name,
        })
    }
}
