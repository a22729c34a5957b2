use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::release::fetcher::FetchPolicy;

// =============================================================================
// Defaults
// =============================================================================

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Default cache refresh period in seconds
pub const DEFAULT_REFRESH_PERIOD_SECS: u64 = 30;

/// Default base URL for the GitHub REST API
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Transport-level timeout for a single remote request (30 seconds)
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of commits shown on the release page
pub const VIEW_COMMIT_LIMIT: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Repository must be in the format owner/repo, got {0:?}")]
    InvalidRepo(String),
}

/// Repository identifier in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for RepoId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(owner, name))
            }
            _ => Err(ConfigError::InvalidRepo(s.to_string())),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Process configuration, read from flags with environment variable fallbacks
#[derive(Debug, Clone, Parser)]
#[command(name = "release-info")]
#[command(version, about = "Serve the latest release information of a GitHub repository")]
pub struct Config {
    /// Repository to track, in the format owner/repo
    #[arg(long, env = "REPO")]
    pub repo: RepoId,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Cache refresh period in seconds
    #[arg(
        long,
        env = "CACHE_REFRESH_PERIOD",
        default_value_t = DEFAULT_REFRESH_PERIOD_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub cache_refresh_period: u64,

    /// Token sent as a bearer credential to the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Base URL of the GitHub API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Fail the whole refresh when commits or tags cannot be fetched,
    /// instead of substituting an empty list
    #[arg(long, env = "STRICT_FETCH")]
    pub strict: bool,
}

impl Config {
    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.cache_refresh_period)
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        if self.strict {
            FetchPolicy::Strict
        } else {
            FetchPolicy::Degrade
        }
    }
}
