//! HTTP surface for the search service
//!
//! A thin axum shell: /search validates parameters and delegates to the
//! service, /stats exposes index statistics, /health reports liveness.
//! Errors in one request never affect others.

use crate::search::service::SearchService;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Query string parameters of /search
#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
    page: Option<usize>,
    limit: Option<usize>,
}

/// Builds the router over a shared search service
pub fn router(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .with_state(service)
}

/// Binds and serves the search HTTP surface until shutdown
pub async fn serve(service: Arc<SearchService>, host: &str, port: u16) -> crate::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Search service listening on http://{}", addr);
    axum::serve(listener, router(service)).await?;
    Ok(())
}

async fn search_handler(
    State(service): State<Arc<SearchService>>,
    Query(params): Query<SearchParams>,
) -> (StatusCode, Json<Value>) {
    let query = params.q.as_deref().map(str::trim).unwrap_or("");
    if query.is_empty() {
        return bad_request("Query parameter \"q\" is required");
    }

    let page = params.page.unwrap_or(1);
    if page < 1 {
        return bad_request("Page must be >= 1");
    }

    let limit = params.limit.unwrap_or(10);
    if !(1..=100).contains(&limit) {
        return bad_request("Limit must be between 1 and 100");
    }

    match service.search(query, page, limit) {
        Ok(response) => match serde_json::to_value(&response) {
            Ok(body) => (StatusCode::OK, Json(body)),
            Err(e) => internal_error("search", &e.to_string()),
        },
        Err(e) => internal_error("search", &e.to_string()),
    }
}

async fn stats_handler(State(service): State<Arc<SearchService>>) -> (StatusCode, Json<Value>) {
    match serde_json::to_value(service.stats()) {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => internal_error("stats", &e.to_string()),
    }
}

async fn health_handler(State(service): State<Arc<SearchService>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().timestamp_millis() as f64 / 1000.0,
        "index_loaded": service.is_loaded(),
    }))
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn internal_error(endpoint: &str, detail: &str) -> (StatusCode, Json<Value>) {
    tracing::error!("{} error: {}", endpoint, detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}
