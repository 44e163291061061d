use anyhow::Result;
use axum::{extract::{Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use trove_core::{SearchEngine, SearchResult};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    /// Maximum number of results; all matches when absent.
    pub k: Option<usize>,
}

#[derive(Deserialize)]
pub struct AutocompleteParams {
    pub prefix: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub suggestion: String,
    pub results: Vec<SearchResult>,
}

#[derive(Serialize)]
pub struct AutocompleteResponse {
    pub suggestions: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub admin_token: Option<String>,
    /// Names uploads `uploaded_doc_<n>.txt`, starting at 1.
    pub uploads: Arc<AtomicUsize>,
}

type ApiError = (StatusCode, String);

/// Run engine work that rebuilds the index on the blocking pool, so builds
/// never hold a runtime worker.
async fn blocking<T, F>(engine: &Arc<SearchEngine>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&SearchEngine) -> T + Send + 'static,
{
    let engine = Arc::clone(engine);
    tokio::task::spawn_blocking(move || f(&engine))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("index task failed: {e}")))
}

/// Build the router. `admin_token` guards the `/index/*` endpoints; with
/// `None` they always answer 401.
pub fn build_app(engine: Arc<SearchEngine>, admin_token: Option<String>) -> Result<Router> {
    let app_state = AppState { engine, admin_token, uploads: Arc::new(AtomicUsize::new(1)) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/autocomplete", get(autocomplete_handler))
        .route("/upload", post(upload_handler))
        .route("/loadSample", get(load_sample_handler))
        .route("/index/build", post(index_build))
        .route("/index/clear", post(index_clear))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.q.ok_or((StatusCode::BAD_REQUEST, "Missing query".to_string()))?;
    let start = std::time::Instant::now();
    let mut results = state.engine.search(&query);
    let total_hits = results.len();
    if let Some(k) = params.k {
        results.truncate(k);
    }
    let suggestion = results.first().map(|r| r.suggestion.clone()).unwrap_or_default();
    let elapsed = start.elapsed();
    tracing::debug!(%query, total_hits, took_us = elapsed.as_micros() as u64, "search");
    Ok(Json(SearchResponse { query, took_s: elapsed.as_secs_f64(), total_hits, suggestion, results }))
}

pub async fn autocomplete_handler(State(state): State<AppState>, Query(params): Query<AutocompleteParams>) -> Result<Json<AutocompleteResponse>, ApiError> {
    let prefix = params.prefix.ok_or((StatusCode::BAD_REQUEST, "Missing prefix".to_string()))?;
    Ok(Json(AutocompleteResponse { suggestions: state.engine.autocomplete(&prefix) }))
}

async fn upload_handler(State(state): State<AppState>, body: String) -> Result<&'static str, ApiError> {
    if body.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Empty file content".into()));
    }
    let n = state.uploads.fetch_add(1, Ordering::Relaxed);
    let name = format!("uploaded_doc_{n}.txt");
    let bytes = body.len();
    let doc_name = name.clone();
    let doc_id = blocking(&state.engine, move |engine| engine.add_document_content(&doc_name, &body)).await?;
    tracing::info!(%name, doc_id, bytes, "document uploaded");
    Ok("File uploaded and indexed successfully!")
}

async fn load_sample_handler(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    blocking(&state.engine, SearchEngine::load_sample_dataset).await?;
    Ok("Sample dataset loaded")
}

// --- Admin endpoints ---
async fn index_build(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&state, &headers)?;
    let snapshot = blocking(&state.engine, |engine| {
        engine.build_index();
        engine.snapshot()
    })
    .await?;
    Ok(Json(serde_json::json!({
        "num_docs": snapshot.stats.num_docs,
        "indexed": snapshot.stats.doc_lengths.len(),
        "num_terms": snapshot.index.num_terms(),
        "avg_doc_length": snapshot.stats.avg_doc_length,
    })))
}

async fn index_clear(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&state, &headers)?;
    blocking(&state.engine, SearchEngine::clear_index).await?;
    Ok(Json(serde_json::json!({ "cleared": true })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
