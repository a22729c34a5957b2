//! Assembles release snapshots from a [`ReleaseSource`]

use chrono::Utc;
use tracing::{debug, error};

use crate::config::RepoId;
use crate::release::classify::{classify, is_valid_version};
use crate::release::error::{FetchError, RemoteError};
use crate::release::source::ReleaseSource;
use crate::release::types::{ChangeType, Commit, ReleaseSnapshot, Tag};

/// What to do when one of the two remote calls fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Substitute an empty list, record the failure in the snapshot and continue
    #[default]
    Degrade,
    /// Abort the whole fetch cycle
    Strict,
}

/// Keep only tags whose name is a valid semantic version, preserving order
pub fn filter_valid_tags(tags: Vec<Tag>) -> Vec<Tag> {
    tags.into_iter()
        .filter(|tag| is_valid_version(&tag.name))
        .collect()
}

/// Fetch commits and tags and derive the current/previous release
///
/// Both remote calls are issued concurrently. Under [`FetchPolicy::Degrade`]
/// this never fails; failed calls are listed in [`ReleaseSnapshot::degraded`].
pub async fn fetch_release_data(
    source: &dyn ReleaseSource,
    repo: &RepoId,
    policy: FetchPolicy,
) -> Result<ReleaseSnapshot, FetchError> {
    let (commits, tags) = tokio::join!(source.fetch_commits(repo), source.fetch_tags(repo));

    let mut degraded = Vec::new();

    let commits: Vec<Commit> = recover(
        commits.map_err(|e| report(repo, "commits", e, FetchError::CommitsUnavailable)),
        policy,
        &mut degraded,
    )?;
    let tags: Vec<Tag> = recover(
        tags.map_err(|e| report(repo, "tags", e, FetchError::TagsUnavailable)),
        policy,
        &mut degraded,
    )?;

    let tags = filter_valid_tags(tags);
    debug!(
        "Fetched {} commits and {} valid tags for {}",
        commits.len(),
        tags.len(),
        repo
    );

    let mut current_version = String::new();
    let mut previous_version = String::new();
    let mut change_type = ChangeType::Unclassified;

    if let Some(current) = tags.first() {
        current_version = current.name.clone();

        if let Some(previous) = tags.get(1) {
            previous_version = previous.name.clone();
            change_type = classify(&current_version, &previous_version);
        }
    }

    Ok(ReleaseSnapshot {
        commits,
        tags,
        current_version,
        previous_version,
        change_type,
        fetched_at: Utc::now(),
        degraded,
    })
}

fn report(
    repo: &RepoId,
    what: &str,
    err: RemoteError,
    kind: fn(String) -> FetchError,
) -> FetchError {
    error!("Error fetching {} for {}: {}", what, repo, err);
    kind(err.to_string())
}

fn recover<T: Default>(
    result: Result<T, FetchError>,
    policy: FetchPolicy,
    degraded: &mut Vec<FetchError>,
) -> Result<T, FetchError> {
    match (result, policy) {
        (Ok(value), _) => Ok(value),
        (Err(e), FetchPolicy::Strict) => Err(e),
        (Err(e), FetchPolicy::Degrade) => {
            degraded.push(e);
            Ok(T::default())
        }
    }
}
