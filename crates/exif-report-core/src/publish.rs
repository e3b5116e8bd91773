//! Posting reports as pull request comments.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{PullRequestTarget, SecretToken};
use crate::error::PublishError;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

/// Destination for finished reports.
#[async_trait]
pub trait CommentPublisher: Send + Sync {
    /// Attach `body` as a comment on `target`. No retries.
    async fn publish(&self, target: &PullRequestTarget, body: &str) -> Result<(), PublishError>;
}

#[derive(Serialize)]
struct NewComment<'a> {
    body: &'a str,
}

/// Issue comments client for the GitHub REST API.
pub struct GitHubCommenter {
    api_url: String,
    token: SecretToken,
    http_client: reqwest::Client,
}

impl GitHubCommenter {
    /// Create a client against `api_url` (e.g. [`DEFAULT_API_URL`]).
    pub fn new(api_url: &str, token: SecretToken) -> Result<Self, PublishError> {
        let api_url = api_url.trim_end_matches('/');
        if !(api_url.starts_with("https://") || api_url.starts_with("http://")) {
            return Err(PublishError::InvalidBaseUrl(api_url.to_string()));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("exif-report/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api_url: api_url.to_string(),
            token,
            http_client,
        })
    }

    /// Comments endpoint for a pull request.
    pub fn comments_url(&self, target: &PullRequestTarget) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url, target.owner, target.repo, target.number
        )
    }

    /// Build, without sending, the request that posts `body`.
    pub fn build_request(
        &self,
        target: &PullRequestTarget,
        body: &str,
    ) -> Result<reqwest::Request, PublishError> {
        let request = self
            .http_client
            .post(self.comments_url(target))
            .bearer_auth(self.token.expose())
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(&NewComment { body })
            .build()?;
        Ok(request)
    }
}

#[async_trait]
impl CommentPublisher for GitHubCommenter {
    async fn publish(&self, target: &PullRequestTarget, body: &str) -> Result<(), PublishError> {
        let request = self.build_request(target, body)?;
        debug!(url = %request.url(), "Posting comment");

        let response = self.http_client.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(rejection(status, response.text().await))
    }
}

/// Error for a non-2xx reply. A body that cannot be read is reported in
/// place of the body rather than hiding the status.
fn rejection<E: std::fmt::Display>(
    status: reqwest::StatusCode,
    body: Result<String, E>,
) -> PublishError {
    let body = body.unwrap_or_else(|err| {
        warn!(status = status.as_u16(), error = %err, "Failed to read error response body");
        format!("<unreadable response body: {err}>")
    });
    PublishError::Status {
        status: status.as_u16(),
        body,
    }
}
