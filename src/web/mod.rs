//! HTTP surface of the service
//!
//! - `GET /`: the rendered release page
//! - `GET /api/release`: the same data as JSON
//!
//! Both return 503 until the first refresh has succeeded.

pub mod render;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::cache::{CacheError, ReleaseCache};
use crate::web::render::PageRenderer;

pub const NOT_CACHED_MESSAGE: &str = "Service unavailable: data is not yet cached.";

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ReleaseCache>,
    pub renderer: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(cache: Arc<ReleaseCache>, renderer: PageRenderer) -> Self {
        Self {
            cache,
            renderer: Arc::new(renderer),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(release_page))
        .route("/api/release", get(release_json))
        .with_state(state)
}

/// Serve `state` on `listener` until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server is running on {}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        match self {
            CacheError::NotYetAvailable => {
                (StatusCode::SERVICE_UNAVAILABLE, NOT_CACHED_MESSAGE).into_response()
            }
        }
    }
}

async fn release_page(State(state): State<AppState>) -> Result<Response, CacheError> {
    let view = state.cache.read()?;

    Ok(match state.renderer.render(&view) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render release page: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    })
}

async fn release_json(State(state): State<AppState>) -> Result<Response, CacheError> {
    let view = state.cache.read()?;
    Ok(Json(view).into_response())
}
