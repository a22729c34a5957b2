//! GitHub REST API source implementation

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{FETCH_TIMEOUT, RepoId};
use crate::release::error::RemoteError;
use crate::release::source::ReleaseSource;
use crate::release::types::{Commit, Tag};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Commit record from the commits endpoint
#[derive(Debug, Deserialize)]
struct CommitRecord {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
}

/// Tag record from the tags endpoint
#[derive(Debug, Deserialize)]
struct TagRecord {
    name: String,
    commit: TagCommit,
}

#[derive(Debug, Deserialize)]
struct TagCommit {
    sha: String,
}

/// Source implementation for the GitHub REST API
pub struct GitHubSource {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubSource {
    /// Creates a new GitHubSource against a custom base URL
    ///
    /// When `token` is set, every request carries it as a bearer credential.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("release-info/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| RemoteError::InvalidCredential(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(FETCH_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        repo: &RepoId,
        resource: &str,
    ) -> Result<T, RemoteError> {
        let url = format!(
            "{}/repos/{}/{}/{}",
            self.base_url, repo.owner, repo.name, resource
        );
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(repo.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || (status == reqwest::StatusCode::FORBIDDEN
                && response.headers().contains_key("retry-after"))
        {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(RemoteError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(RemoteError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub {} response: {}", resource, e);
            RemoteError::InvalidResponse(e.to_string())
        })
    }
}

#[async_trait::async_trait]
impl ReleaseSource for GitHubSource {
    async fn fetch_commits(&self, repo: &RepoId) -> Result<Vec<Commit>, RemoteError> {
        let records: Vec<CommitRecord> = self.get_json(repo, "commits").await?;

        Ok(records
            .into_iter()
            .map(|r| Commit::new(r.sha, r.commit.message))
            .collect())
    }

    async fn fetch_tags(&self, repo: &RepoId) -> Result<Vec<Tag>, RemoteError> {
        let records: Vec<TagRecord> = self.get_json(repo, "tags").await?;

        Ok(records
            .into_iter()
            .map(|r| Tag::new(r.name, r.commit.sha))
            .collect())
    }
}
