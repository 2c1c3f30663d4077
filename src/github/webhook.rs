use std::fmt::{Debug, Display, Formatter};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::bot::SweepRequest;

/// Payload of the `POST /close_stale_prs` endpoint, sent periodically by an external
/// cron job.
///
/// All fields are optional at the parsing level, so that a request with missing fields
/// can be rejected silently instead of failing the extraction.
#[derive(Deserialize, Debug, Default)]
pub struct CloseStalePrsRequest {
    pub repository: Option<String>,
    pub cron_token: Option<String>,
    pub installation: Option<InstallationField>,
}

/// The installation can be sent either as a number or as a string.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum InstallationField {
    Number(u64),
    Text(String),
}

impl Display for InstallationField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallationField::Number(id) => Display::fmt(id, f),
            InstallationField::Text(id) => Display::fmt(id, f),
        }
    }
}

/// Reason why a request did not result in a sweep.
/// It is only logged, the caller never learns about it.
#[derive(Debug, PartialEq, Eq)]
pub enum Rejection {
    MissingToken,
    InvalidToken,
    MissingRepository,
    MissingInstallation,
}

impl CloseStalePrsRequest {
    /// Checks the cron token and the required fields, and returns the sweep that should be
    /// performed.
    pub fn into_sweep(self, token: &CronToken) -> Result<SweepRequest, Rejection> {
        let Some(cron_token) = self.cron_token else {
            return Err(Rejection::MissingToken);
        };
        if !token.matches(&cron_token) {
            return Err(Rejection::InvalidToken);
        }
        let Some(repository) = self.repository else {
            return Err(Rejection::MissingRepository);
        };
        let Some(installation) = self.installation else {
            return Err(Rejection::MissingInstallation);
        };
        Ok(SweepRequest {
            repository,
            installation: installation.to_string(),
        })
    }
}

/// Wrapper for the shared cron secret which is zeroed on drop and can be only compared
/// against, never displayed.
pub struct CronToken(SecretString);

impl CronToken {
    pub fn new(token: String) -> Self {
        Self(token.into())
    }

    pub fn matches(&self, token: &str) -> bool {
        self.0.expose_secret().as_str() == token
    }
}

impl Debug for CronToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("CronToken(<redacted>)")
    }
}
