use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use release_info::cache::ReleaseCache;
use release_info::cache::scheduler::spawn_refresh_task;
use release_info::config::Config;
use release_info::release::github::GitHubSource;
use release_info::web::render::PageRenderer;
use release_info::web::{AppState, serve};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("release_info=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: Config) -> anyhow::Result<()> {
    let source = GitHubSource::new(&config.api_base_url, config.github_token.as_deref())
        .context("Failed to create GitHub client")?;
    let cache = Arc::new(ReleaseCache::new(
        Arc::new(source),
        config.repo.clone(),
        config.fetch_policy(),
    ));
    let renderer = PageRenderer::new().context("Failed to load page template")?;

    let refresh_task = spawn_refresh_task(cache.clone(), config.refresh_period());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    serve(listener, AppState::new(cache, renderer), async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutting down");
    })
    .await
    .context("Server error")?;

    refresh_task.abort();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}
