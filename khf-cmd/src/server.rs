//! HTTP dashboard server.
//!
//! Routes:
//!
//! | route               | response                                          |
//! |---------------------|---------------------------------------------------|
//! | `GET /`             | dashboard page for `?county=&constituency=`       |
//! | `GET /export.csv`   | CSV download of the same view                     |
//! | `GET /api/options`  | selection domains for `?county=` as JSON          |
//! | `POST /api/reload`  | drop the cached dataset and load it again         |
//! | `GET /health`       | 200 once the dataset is loaded, 503 otherwise     |
//!
//! A dataset that fails to load yields an error page with status 503; the
//! dashboard itself is never rendered from a partial table.

use crate::config::DashboardConfig;
use crate::export::filtered_csv;
use crate::options::SelectionOptions;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use khf_dashboard::{export_filename, render_error_page, DashboardView, DatasetCache, Snapshot};
use khf_facility::FilterSelection;
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub const EXPORT_ROUTE: &str = "/export.csv";

pub type AppState = Arc<DatasetCache>;

/// Query string of the dashboard and export routes.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub county: Option<String>,
    pub constituency: Option<String>,
}

impl SelectionQuery {
    fn selection(self) -> FilterSelection {
        FilterSelection::from_raw(self.county, self.constituency)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OptionsQuery {
    pub county: Option<String>,
}

/// Error returned by the route handlers.
///
/// Dataset load failures become a 503 error page, anything else a 500.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title) = if Snapshot::load_error(&self.0).is_some() {
            (StatusCode::SERVICE_UNAVAILABLE, "Dataset unavailable")
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        };
        error!("server: {}: {:#}", title, self.0);
        let message = format!("{:#}", self.0);
        let body = render_error_page(title, &message).unwrap_or_else(|e| {
            warn!("server: Failed to render error page: {e:#}");
            format!("{title}: {message}")
        });
        (status, Html(body)).into_response()
    }
}

pub fn router(cache: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route(EXPORT_ROUTE, get(export))
        .route("/api/options", get(options))
        .route("/api/reload", post(reload))
        .route("/health", get(health))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .with_state(cache)
}

/// Run the dashboard server until Ctrl+C.
pub async fn serve(config: DashboardConfig) -> anyhow::Result<()> {
    let cache = Arc::new(DatasetCache::new(config.source, config.cache_ttl));
    info!(
        "server: Serving {} (reloaded every {}s)",
        cache.source(),
        cache.ttl().as_secs()
    );

    // Load eagerly so a broken dataset shows up in the log at startup.
    match cache.get().await {
        Ok(snapshot) => info!(
            "server: Loaded {} facilities from {}",
            snapshot.report.loaded,
            cache.source()
        ),
        Err(e) => warn!("server: Initial load of {} failed: {:#}", cache.source(), e),
    }

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!("server: Dashboard listening on http://{}", config.listen);
    axum::serve(listener, router(cache))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server: Stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("server: Received Ctrl+C, shutting down"),
        Err(e) => {
            warn!("server: Unable to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    }
}

// ───────────────────── Handlers ─────────────────────

async fn dashboard(
    State(cache): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Html<String>, AppError> {
    let snapshot = cache.get().await?;
    let selection = query.selection();
    // SQLite queries block, keep them off the async workers.
    let html = tokio::task::spawn_blocking(move || -> anyhow::Result<String> {
        let view = DashboardView::build(&snapshot, selection, Some(EXPORT_ROUTE))?;
        view.to_html(&snapshot)
    })
    .await??;
    Ok(Html(html))
}

async fn export(
    State(cache): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Response, AppError> {
    let snapshot = cache.get().await?;
    let selection = query.selection();
    let (selection, csv) =
        tokio::task::spawn_blocking(move || filtered_csv(&snapshot, selection)).await??;
    let filename = export_filename(&selection);
    info!("server: Exporting {}", filename);
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, csv).into_response())
}

async fn options(
    State(cache): State<AppState>,
    Query(query): Query<OptionsQuery>,
) -> Result<Json<SelectionOptions>, AppError> {
    let snapshot = cache.get().await?;
    Ok(Json(SelectionOptions::for_county(&snapshot, query.county)?))
}

async fn reload(State(cache): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    cache.invalidate().await;
    let snapshot = cache.get().await?;
    Ok(Json(json!({
        "loaded": snapshot.report.loaded,
        "skipped": snapshot.report.skipped,
        "loaded_at": snapshot.loaded_at,
    })))
}

async fn health(State(cache): State<AppState>) -> Response {
    match cache.get().await {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "source": cache.source().to_string(),
                "cache_ttl_secs": cache.ttl().as_secs(),
                "facilities": snapshot.report.loaded,
                "loaded_at": snapshot.loaded_at,
            })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "error": format!("{e:#}") })),
        )
            .into_response(),
    }
}
