//! HTTP API for tag lookups.
//!
//! Routes:
//! - `GET /ip-tags/{ip}`: JSON array of tags
//! - `GET /ip-tags-report/{ip}`: HTML table of tags
//! - `GET /health`: index statistics

mod error;

pub use error::{ApiError, ApiResult, ErrorDetail, ErrorResponse};

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::handle::IndexHandle;
use crate::index::parse_address;
use crate::{report, Error, Result};

/// Create the API routes.
pub fn router(handle: Arc<IndexHandle>) -> Router {
    Router::new()
        .route("/ip-tags/{ip}", get(ip_tags))
        .route("/ip-tags-report/{ip}", get(ip_tags_report))
        .route("/health", get(health))
        .with_state(handle)
}

async fn ip_tags(
    State(handle): State<Arc<IndexHandle>>,
    uri: Uri,
    ip: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<String>>> {
    let addr = address_param(&uri, ip)?;
    Ok(Json(handle.tags_for(addr)))
}

async fn ip_tags_report(
    State(handle): State<Arc<IndexHandle>>,
    uri: Uri,
    ip: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult<Html<String>> {
    let addr = address_param(&uri, ip)?;
    let tags = handle.tags_for(addr);
    Ok(Html(report::render(addr, &tags)))
}

/// Parse the `{ip}` segment.
///
/// A segment that does not decode to UTF-8 is reported with its raw,
/// still percent-encoded text.
fn address_param(
    uri: &Uri,
    ip: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult<Ipv4Addr> {
    match ip {
        Ok(Path(ip)) => Ok(parse_address(&ip)?),
        Err(rejection) => {
            log::debug!("Rejected address segment in {}: {}", uri.path(), rejection);
            let raw = uri.path().rsplit('/').next().unwrap_or_default();
            Err(ApiError::InvalidAddress(raw.to_string()))
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub networks: usize,
    pub tags: usize,
    pub generation: u64,
}

async fn health(State(handle): State<Arc<IndexHandle>>) -> Json<HealthResponse> {
    let index = handle.snapshot();
    Json(HealthResponse {
        status: "ok",
        networks: index.len(),
        tags: index.tag_count(),
        generation: handle.generation(),
    })
}

/// Build the index from the configured knowledge base and serve the API
/// until Ctrl-C.
///
/// On unix, `SIGHUP` rebuilds the index from the same file and swaps it in.
pub async fn run(config: ServerConfig) -> Result<()> {
    let path = config.knowledge_base.clone();
    let handle = tokio::task::spawn_blocking(move || IndexHandle::from_path(path))
        .await
        .map_err(|e| Error::Config(format!("index build task failed: {}", e)))??;
    let handle = Arc::new(handle);

    let listener = TcpListener::bind(config.listen).await?;
    log::info!(
        "Serving {} networks from {:?} on http://{}",
        handle.snapshot().len(),
        config.knowledge_base,
        listener.local_addr()?
    );

    #[cfg(unix)]
    tokio::spawn(reload_on_hangup(handle.clone()));

    axum::serve(listener, router(handle))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

#[cfg(unix)]
async fn reload_on_hangup(handle: Arc<IndexHandle>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Failed to install SIGHUP handler, hot reload disabled: {}", e);
            return;
        }
    };

    while hangup.recv().await.is_some() {
        log::info!("SIGHUP received, reloading knowledge base");
        let handle = handle.clone();
        match tokio::task::spawn_blocking(move || handle.reload()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::error!("Failed to reload knowledge base: {}", e),
            Err(e) => log::error!("Reload task failed: {}", e),
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}
