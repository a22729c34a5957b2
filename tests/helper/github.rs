//! GitHub API test utilities

use std::sync::Arc;

use mockito::{Mock, ServerGuard};
use serde_json::json;

use release_info::cache::ReleaseCache;
use release_info::config::RepoId;
use release_info::release::fetcher::FetchPolicy;
use release_info::release::github::GitHubSource;
use release_info::web::AppState;
use release_info::web::render::PageRenderer;

/// Commits in GitHub's wire format, newest first
pub fn commits_body(messages: &[(&str, &str)]) -> String {
    let records: Vec<_> = messages
        .iter()
        .map(|(sha, message)| json!({ "sha": sha, "commit": { "message": message } }))
        .collect();
    serde_json::Value::Array(records).to_string()
}

/// Tags in GitHub's wire format, newest first
pub fn tags_body(tags: &[(&str, &str)]) -> String {
    let records: Vec<_> = tags
        .iter()
        .map(|(name, sha)| json!({ "name": name, "commit": { "sha": sha } }))
        .collect();
    serde_json::Value::Array(records).to_string()
}

pub async fn mock_endpoint(
    server: &mut ServerGuard,
    resource: &str,
    status: usize,
    body: String,
) -> Mock {
    server
        .mock("GET", format!("/repos/owner/repo/{}", resource).as_str())
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

/// App state whose cache reads from the mock server
pub fn create_test_state(server: &ServerGuard, policy: FetchPolicy) -> AppState {
    let source = GitHubSource::new(&server.url(), Some("test-token")).unwrap();
    let cache = Arc::new(ReleaseCache::new(
        Arc::new(source),
        RepoId::new("owner", "repo"),
        policy,
    ));
    AppState::new(cache, PageRenderer::new().unwrap())
}
