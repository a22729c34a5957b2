//! Single-slot in-memory cache of the latest release snapshot
//!
//! - [`ReleaseCache`]: holds the snapshot, refreshes it and builds the read-side view
//! - [`scheduler`]: background task that refreshes the cache periodically

pub mod scheduler;

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{RepoId, VIEW_COMMIT_LIMIT};
use crate::release::error::FetchError;
use crate::release::fetcher::{FetchPolicy, fetch_release_data};
use crate::release::source::ReleaseSource;
use crate::release::types::{ChangeType, ReleaseSnapshot};

pub const CURRENT_VERSION_PLACEHOLDER: &str = "N/A";
pub const PREVIOUS_VERSION_PLACEHOLDER: &str = "No previous version available";
pub const CHANGE_TYPE_PLACEHOLDER: &str = "N/A";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Release data is not yet cached")]
    NotYetAvailable,
}

/// Result of a single [`ReleaseCache::refresh`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot was installed
    Updated,
    /// Another refresh was in flight; nothing was fetched
    Skipped,
    /// The fetch failed; the previous snapshot is still cached
    Failed(FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitView {
    pub sha: String,
    /// First line of the commit message
    pub message: String,
}

/// Read-side data handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseView {
    pub commits: Vec<CommitView>,
    pub current_version: String,
    pub previous_version: String,
    pub change_type: String,
    pub repository: String,
    pub fetched_at: DateTime<Utc>,
    /// True when part of the data could not be fetched
    pub degraded: bool,
}

impl ReleaseView {
    /// Build the view for `snapshot`, substituting placeholders for missing fields
    pub fn from_snapshot(snapshot: &ReleaseSnapshot, repo: &RepoId) -> Self {
        let commits = snapshot
            .commits
            .iter()
            .take(VIEW_COMMIT_LIMIT)
            .map(|c| CommitView {
                sha: c.sha.clone(),
                message: c.summary().to_string(),
            })
            .collect();

        let current_version = if snapshot.current_version.is_empty() {
            CURRENT_VERSION_PLACEHOLDER.to_string()
        } else {
            snapshot.current_version.clone()
        };

        let previous_version = if snapshot.previous_version.is_empty() {
            PREVIOUS_VERSION_PLACEHOLDER.to_string()
        } else {
            snapshot.previous_version.clone()
        };

        let change_type = match snapshot.change_type {
            ChangeType::Unclassified => CHANGE_TYPE_PLACEHOLDER.to_string(),
            other => other.to_string(),
        };

        Self {
            commits,
            current_version,
            previous_version,
            change_type,
            repository: repo.to_string(),
            fetched_at: snapshot.fetched_at,
            degraded: snapshot.is_degraded(),
        }
    }
}

/// Holds the most recent successfully fetched snapshot of one repository
///
/// The slot is only replaced as a whole, so readers see either the previous
/// snapshot or the new one.
pub struct ReleaseCache {
    source: Arc<dyn ReleaseSource>,
    repo: RepoId,
    policy: FetchPolicy,
    slot: RwLock<Option<Arc<ReleaseSnapshot>>>,
    refreshing: tokio::sync::Mutex<()>,
}

impl ReleaseCache {
    pub fn new(source: Arc<dyn ReleaseSource>, repo: RepoId, policy: FetchPolicy) -> Self {
        Self {
            source,
            repo,
            policy,
            slot: RwLock::new(None),
            refreshing: tokio::sync::Mutex::new(()),
        }
    }

    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    /// Fetch fresh release data and install it on success
    ///
    /// Never fails; errors are logged and reported through the outcome.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Ok(_guard) = self.refreshing.try_lock() else {
            info!("Skipping refresh for {}: already in progress", self.repo);
            return RefreshOutcome::Skipped;
        };

        info!("Refreshing cache for {}", self.repo);

        match fetch_release_data(self.source.as_ref(), &self.repo, self.policy).await {
            Ok(snapshot) => {
                if snapshot.is_degraded() {
                    warn!(
                        "Cached degraded data for {}: {} sub-fetch(es) failed",
                        self.repo,
                        snapshot.degraded.len()
                    );
                }
                self.install(snapshot);
                info!("Cache refreshed successfully");
                RefreshOutcome::Updated
            }
            Err(e) => {
                error!("Error refreshing cache for {}: {}", self.repo, e);
                RefreshOutcome::Failed(e)
            }
        }
    }

    fn install(&self, snapshot: ReleaseSnapshot) {
        let snapshot = Arc::new(snapshot);
        match self.slot.write() {
            Ok(mut slot) => *slot = Some(snapshot),
            Err(poisoned) => *poisoned.into_inner() = Some(snapshot),
        }
    }

    /// The cached snapshot, if any refresh has succeeded yet
    pub fn snapshot(&self) -> Option<Arc<ReleaseSnapshot>> {
        match self.slot.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Build the presentation view of the cached snapshot
    pub fn read(&self) -> Result<ReleaseView, CacheError> {
        let snapshot = self.snapshot().ok_or(CacheError::NotYetAvailable)?;
        Ok(ReleaseView::from_snapshot(&snapshot, &self.repo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::error::RemoteError;
    use crate::release::source::MockReleaseSource;
    use crate::release::types::{Commit, Tag};
    use std::time::Duration;

    fn repo() -> RepoId {
        RepoId::new("owner", "repo")
    }

    fn ten_commits() -> Vec<Commit> {
        [
            "Initial commit",
            "Second commit",
            "Third commit",
            "Fourth commit",
            "Fifth commit",
            "Sixth commit",
            "Seventh commit",
            "Eighth commit",
            "Ninth commit",
            "Tenth commit",
        ]
        .iter()
        .enumerate()
        .map(|(i, msg)| Commit::new(format!("sha{}", i), *msg))
        .collect()
    }

    fn cache_with(source: MockReleaseSource, policy: FetchPolicy) -> ReleaseCache {
        ReleaseCache::new(Arc::new(source), repo(), policy)
    }

    fn source_returning(commits: Vec<Commit>, tags: Vec<Tag>) -> MockReleaseSource {
        let mut source = MockReleaseSource::new();
        source
            .expect_fetch_commits()
            .returning(move |_| Ok(commits.clone()));
        source
            .expect_fetch_tags()
            .returning(move |_| Ok(tags.clone()));
        source
    }

    #[test]
    fn read_before_first_refresh_is_not_available() {
        let cache = cache_with(MockReleaseSource::new(), FetchPolicy::Degrade);

        assert_eq!(cache.read(), Err(CacheError::NotYetAvailable));
        assert!(cache.snapshot().is_none());
    }

    #[tokio::test]
    async fn read_after_refresh_returns_five_commits_and_versions() {
        let cache = cache_with(
            source_returning(
                ten_commits(),
                vec![Tag::new("v1.0.0", "123"), Tag::new("v0.9.0", "456")],
            ),
            FetchPolicy::Degrade,
        );

        assert_eq!(cache.refresh().await, RefreshOutcome::Updated);
        let view = cache.read().unwrap();

        assert_eq!(
            view.commits.iter().map(|c| c.message.as_str()).collect::<Vec<_>>(),
            vec![
                "Initial commit",
                "Second commit",
                "Third commit",
                "Fourth commit",
                "Fifth commit"
            ]
        );
        assert_eq!(view.current_version, "v1.0.0");
        assert_eq!(view.previous_version, "v0.9.0");
        assert_eq!(view.change_type, "Major");
        assert_eq!(view.repository, "owner/repo");
        assert!(!view.degraded);

        // the cache keeps the full list
        assert_eq!(cache.snapshot().unwrap().commits.len(), 10);
    }

    #[tokio::test]
    async fn read_applies_placeholders_for_empty_snapshot() {
        let cache = cache_with(source_returning(vec![], vec![]), FetchPolicy::Degrade);

        cache.refresh().await;
        let view = cache.read().unwrap();

        assert!(view.commits.is_empty());
        assert_eq!(view.current_version, "N/A");
        assert_eq!(view.previous_version, "No previous version available");
        assert_eq!(view.change_type, "N/A");
    }

    #[tokio::test]
    async fn read_with_single_tag_keeps_current_version() {
        let cache = cache_with(
            source_returning(
                vec![Commit::new("123", "Initial commit")],
                vec![Tag::new("v1.0.0", "123")],
            ),
            FetchPolicy::Degrade,
        );

        cache.refresh().await;
        let view = cache.read().unwrap();

        assert_eq!(
            view.commits,
            vec![CommitView {
                sha: "123".to_string(),
                message: "Initial commit".to_string()
            }]
        );
        assert_eq!(view.current_version, "v1.0.0");
        assert_eq!(view.previous_version, "No previous version available");
        assert_eq!(view.change_type, "N/A");
    }

    #[test]
    fn view_truncates_multiline_messages_to_first_line() {
        let snapshot = ReleaseSnapshot {
            commits: vec![Commit::new("abc", "Fix parser\n\nCloses #12\nSigned-off-by: someone")],
            tags: vec![],
            current_version: String::new(),
            previous_version: String::new(),
            change_type: ChangeType::Unclassified,
            fetched_at: Utc::now(),
            degraded: vec![],
        };

        let view = ReleaseView::from_snapshot(&snapshot, &repo());

        assert_eq!(view.commits[0].message, "Fix parser");
        assert_eq!(snapshot.commits[0].message.lines().count(), 4);
    }

    #[test]
    fn view_shows_none_change_type_as_label() {
        let snapshot = ReleaseSnapshot {
            commits: vec![],
            tags: vec![],
            current_version: "v1.0.0".to_string(),
            previous_version: "v1.0.0-rc.1".to_string(),
            change_type: ChangeType::None,
            fetched_at: Utc::now(),
            degraded: vec![],
        };

        let view = ReleaseView::from_snapshot(&snapshot, &repo());

        assert_eq!(view.change_type, "None");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let mut source = MockReleaseSource::new();
        let mut seq = mockall::Sequence::new();
        source
            .expect_fetch_commits()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![Commit::new("123", "Initial commit")]));
        source
            .expect_fetch_commits()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(RemoteError::InvalidResponse("offline".to_string())));
        source
            .expect_fetch_tags()
            .returning(|_| Ok(vec![Tag::new("v1.0.0", "123")]));

        let cache = cache_with(source, FetchPolicy::Strict);

        assert_eq!(cache.refresh().await, RefreshOutcome::Updated);
        let before = cache.snapshot().unwrap();

        let outcome = cache.refresh().await;

        assert!(matches!(
            outcome,
            RefreshOutcome::Failed(FetchError::CommitsUnavailable(_))
        ));
        let after = cache.snapshot().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(cache.read().unwrap().current_version, "v1.0.0");
    }

    #[tokio::test]
    async fn failed_first_refresh_leaves_cache_empty() {
        let mut source = MockReleaseSource::new();
        source
            .expect_fetch_commits()
            .returning(|_| Err(RemoteError::NotFound("owner/repo".to_string())));
        source.expect_fetch_tags().returning(|_| Ok(vec![]));

        let cache = cache_with(source, FetchPolicy::Strict);
        cache.refresh().await;

        assert_eq!(cache.read(), Err(CacheError::NotYetAvailable));
    }

    #[tokio::test]
    async fn degraded_refresh_replaces_snapshot_and_flags_view() {
        let mut source = MockReleaseSource::new();
        source
            .expect_fetch_commits()
            .returning(|_| Ok(vec![Commit::new("123", "Initial commit")]));
        source
            .expect_fetch_tags()
            .returning(|_| Err(RemoteError::InvalidResponse("offline".to_string())));

        let cache = cache_with(source, FetchPolicy::Degrade);

        assert_eq!(cache.refresh().await, RefreshOutcome::Updated);
        let view = cache.read().unwrap();
        assert!(view.degraded);
        assert_eq!(view.current_version, "N/A");
        assert_eq!(view.commits.len(), 1);
    }

    /// Source that blocks its first commit fetch until released
    struct GatedSource {
        gate: tokio::sync::Notify,
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ReleaseSource for GatedSource {
        async fn fetch_commits(&self, _repo: &RepoId) -> Result<Vec<Commit>, RemoteError> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.gate.notified().await;
            Ok(vec![])
        }

        async fn fetch_tags(&self, _repo: &RepoId) -> Result<Vec<Tag>, RemoteError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn refresh_is_skipped_while_another_is_in_flight() {
        let source = Arc::new(GatedSource {
            gate: tokio::sync::Notify::new(),
            calls: std::sync::atomic::AtomicUsize::new(0),
        });
        let cache = Arc::new(ReleaseCache::new(
            source.clone(),
            repo(),
            FetchPolicy::Degrade,
        ));

        let first = tokio::spawn({
            let cache = cache.clone();
            async move { cache.refresh().await }
        });

        // wait until the first refresh is parked inside the source
        while source.calls.load(std::sync::atomic::Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        assert_eq!(cache.refresh().await, RefreshOutcome::Skipped);

        source.gate.notify_one();
        assert_eq!(first.await.unwrap(), RefreshOutcome::Updated);
        assert_eq!(source.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
