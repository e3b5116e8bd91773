//! Run configuration.
//!
//! Values are collected once at process entry (flags or CI environment) and
//! validated here into an immutable [`RunConfig`]. Nothing below the binary
//! reads the process environment.

use crate::error::ConfigError;

/// API token. Never rendered in logs or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretToken(String);

impl SecretToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretToken(***)")
    }
}

impl std::fmt::Display for SecretToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}

/// Pull request a report is posted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestTarget {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestTarget {
    /// Parse `owner/name` plus a decimal PR number.
    pub fn parse(repository: &str, number: &str) -> Result<Self, ConfigError> {
        let repository = repository.trim();
        let (owner, repo) = match repository.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                (owner, repo)
            }
            _ => return Err(ConfigError::InvalidRepository(repository.to_string())),
        };

        let number = number
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigError::InvalidPrNumber(number.to_string()))?;

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        })
    }
}

impl std::fmt::Display for PullRequestTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub token: SecretToken,
    pub target: PullRequestTarget,
}

impl RunConfig {
    /// Validate raw values as found in flags or the environment.
    ///
    /// Missing and blank values are treated alike.
    pub fn from_raw(
        token: Option<&str>,
        repository: Option<&str>,
        pr_number: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let token = non_blank(token).ok_or(ConfigError::MissingToken)?;
        let repository = non_blank(repository).ok_or(ConfigError::MissingRepository)?;
        let pr_number = non_blank(pr_number).ok_or(ConfigError::MissingPrNumber)?;

        Ok(Self {
            token: SecretToken::new(token),
            target: PullRequestTarget::parse(repository, pr_number)?,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
