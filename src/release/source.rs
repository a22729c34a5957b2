//! Source trait for fetching commits and tags from a remote service

#[cfg(test)]
use mockall::automock;

use crate::config::RepoId;
use crate::release::error::RemoteError;
use crate::release::types::{Commit, Tag};

/// Read-only access to the history of a repository
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetches the commit list of a repository
    ///
    /// # Returns
    /// * `Ok(Vec<Commit>)` - Commits, ordered from newest to oldest
    /// * `Err(RemoteError)` - If the fetch fails
    async fn fetch_commits(&self, repo: &RepoId) -> Result<Vec<Commit>, RemoteError>;

    /// Fetches all tags of a repository, unfiltered
    ///
    /// # Returns
    /// * `Ok(Vec<Tag>)` - Tags, ordered from newest to oldest
    /// * `Err(RemoteError)` - If the fetch fails
    async fn fetch_tags(&self, repo: &RepoId) -> Result<Vec<Tag>, RemoteError>;
}
