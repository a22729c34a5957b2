use std::fmt;

use chrono::{DateTime, Utc};

use crate::release::error::FetchError;

/// A commit as returned by the remote API, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    /// Full commit message, may span multiple lines
    pub message: String,
}

impl Commit {
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            message: message.into(),
        }
    }

    /// Text of the message up to, but excluding, the first newline
    pub fn summary(&self) -> &str {
        self.message.split('\n').next().unwrap_or_default()
    }
}

/// A tag and the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub commit_sha: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_sha: commit_sha.into(),
        }
    }
}

/// Coarsest differing component between two semantic versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeType {
    Major,
    Minor,
    Patch,
    /// Versions share major.minor.patch (equal, or differ in pre-release/build only)
    None,
    /// Not enough valid versions to compare
    #[default]
    Unclassified,
}

impl ChangeType {
    /// Label shown to users, `None` for [`ChangeType::Unclassified`]
    pub fn label(&self) -> Option<&'static str> {
        match self {
            ChangeType::Major => Some("Major"),
            ChangeType::Minor => Some("Minor"),
            ChangeType::Patch => Some("Patch"),
            ChangeType::None => Some("None"),
            ChangeType::Unclassified => None,
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("Unclassified"))
    }
}

/// Complete result of one fetch cycle
///
/// Snapshots are immutable once built and are installed into the cache as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseSnapshot {
    pub commits: Vec<Commit>,
    /// Tags with a valid semantic version name, in API order
    pub tags: Vec<Tag>,
    /// Name of the newest valid tag, empty when there is none
    pub current_version: String,
    /// Name of the second newest valid tag, empty when there is none
    pub previous_version: String,
    pub change_type: ChangeType,
    pub fetched_at: DateTime<Utc>,
    /// Sub-fetches that failed and were replaced by an empty list
    pub degraded: Vec<FetchError>,
}

impl ReleaseSnapshot {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}
