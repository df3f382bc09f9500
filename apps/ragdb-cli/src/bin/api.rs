//! HTTP search API.
//!
//! `POST /search` runs a threshold-filtered similarity query and returns
//! scored matches; `GET /` serves the single-page frontend. A missing
//! vector store maps to 503 so callers can tell "not yet ingested" apart
//! from an internal failure.

use std::env;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use ragdb_core::config::{expand_path, Settings};
use ragdb_core::error::Error;
use ragdb_core::traits::Embedder;
use ragdb_embed::get_embedder;
use ragdb_vector::get_store;

const DEFAULT_BIND: &str = "127.0.0.1:8000";

struct AppState {
    settings: Settings,
    embedder: Arc<dyn Embedder>,
}

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
    #[serde(default = "default_k")]
    k: usize,
}

fn default_k() -> usize {
    5
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_tracing(&settings.log_level);

    let bind = env::args().nth(1).unwrap_or_else(|| DEFAULT_BIND.to_string());
    let embedder = get_embedder(&settings)?;
    let state = Arc::new(AppState { settings, embedder });

    let app = Router::new()
        .route("/", get(index))
        .route("/search", post(search))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("serving search API on {bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Serves the main single-page frontend.
async fn index(State(state): State<Arc<AppState>>) -> Response {
    let path = expand_path(&state.settings.static_dir).join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Html(body).into_response(),
        Err(_) => error_response(StatusCode::NOT_FOUND, "Frontend assets missing"),
    }
}

/// Semantic search over the persisted store with relevance filtering.
async fn search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Response {
    if !(1..=20).contains(&request.k) {
        return error_response(StatusCode::BAD_REQUEST, "k must be between 1 and 20");
    }

    let store = match get_store(&state.settings, state.embedder.clone()) {
        Ok(store) => store,
        Err(e) => {
            error!("store construction failed: {e:#}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Search Engine Error");
        }
    };

    match ragdb_vector::search(&store, &request.query, request.k).await {
        Ok(results) => {
            info!("retrieved {} results for '{}'", results.len(), request.query);
            Json(json!({ "results": results })).into_response()
        }
        Err(e) => match e.downcast_ref::<Error>() {
            Some(Error::NotFound(_)) => error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Search database not initialized. Run ingestion.",
            ),
            _ => {
                error!("search failed: {e:#}");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Search Engine Error")
            }
        },
    }
}

fn error_response(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}
