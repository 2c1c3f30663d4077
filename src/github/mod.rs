//! Contains definitions of common types (repository name, pull request and comment
//! identifiers) needed for working with GitHub repositories.
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

pub mod api;
pub mod server;
mod webhook;

pub use webhook::{CloseStalePrsRequest, CronToken, InstallationField};

/// Unique identifier of a GitHub repository
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct GithubRepoName {
    owner: String,
    name: String,
}

impl GithubRepoName {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_lowercase(),
            name: name.to_lowercase(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for GithubRepoName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}/{}", self.owner, self.name))
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseRepoNameError {
    #[error("Repository name `{0}` is not in the `owner/name` format")]
    InvalidFormat(String),
}

impl FromStr for GithubRepoName {
    type Err = ParseRepoNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(ParseRepoNameError::InvalidFormat(value.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PullRequestNumber(pub u64);

impl From<u64> for PullRequestNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for PullRequestNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        <u64 as Display>::fmt(&self.0, f)
    }
}

/// Identifier of an issue/pull request comment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CommentId(pub u64);

impl From<u64> for CommentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
