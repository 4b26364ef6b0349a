//! MarketMap Map Server
//!
//! A small HTTP API that stores saved floor-plan documents by id. Documents
//! are kept as opaque JSON; the server never inspects map contents.
//!
//! ## Endpoints
//!
//! ```text
//! POST /api/maps        body { "filename": "store-7", "mapData": { ... } }
//!                       -> the assigned id as plain text
//! GET  /api/maps/{id}   -> the stored document, or 404
//! GET  /health          -> liveness probe
//! ```
//!
//! An empty or missing `filename` gets a numbered id from a counter, so
//! quick unnamed saves never collide.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Deserialize;
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Body of a save request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveRequest {
    /// Requested id; blank lets the server assign one
    #[serde(default)]
    filename: String,
    /// The map document, stored as-is
    map_data: serde_json::Value,
}

/// A stored document plus its save time
struct StoredMap {
    document: serde_json::Value,
    created_at: DateTime<Utc>,
}

/// Shared application state
struct AppState {
    /// Stored maps by id
    maps: DashMap<String, StoredMap>,
    /// Counter for saves that arrive without a filename
    next_default: AtomicU64,
}

impl AppState {
    fn new() -> Self {
        Self {
            maps: DashMap::new(),
            next_default: AtomicU64::new(1),
        }
    }

    /// The id a save lands under: the trimmed filename, or the next
    /// counter value when the name is blank
    fn assign_id(&self, filename: &str) -> String {
        let trimmed = filename.trim();
        if trimmed.is_empty() {
            self.next_default.fetch_add(1, Ordering::Relaxed).to_string()
        } else {
            trimmed.to_string()
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketmap_server=info,tower_http=info".into()),
        )
        .init();

    let state = Arc::new(AppState::new());

    let app = Router::new()
        .route("/api/maps", post(save_map))
        .route("/api/maps/{id}", get(load_map))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    info!("MarketMap map server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

/// Store a map document and return its id
async fn save_map(State(state): State<Arc<AppState>>, Json(request): Json<SaveRequest>) -> String {
    let id = state.assign_id(&request.filename);
    let stored = StoredMap {
        document: request.map_data,
        created_at: Utc::now(),
    };
    info!("map {} saved at {}", id, stored.created_at);
    state.maps.insert(id.clone(), stored);
    id
}

/// Fetch a stored map document
async fn load_map(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.maps.get(&id) {
        Some(stored) => {
            info!("map {} loaded (saved {})", id, stored.created_at);
            Json(stored.document.clone()).into_response()
        }
        None => {
            warn!("map {} not found", id);
            (StatusCode::NOT_FOUND, "map not found").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_id_uses_trimmed_filename() {
        let state = AppState::new();
        assert_eq!(state.assign_id("  store 7  "), "store 7");
        assert_eq!(state.assign_id("aisle-three"), "aisle-three");
    }

    #[test]
    fn test_assign_id_counts_unnamed_saves() {
        let state = AppState::new();
        assert_eq!(state.assign_id(""), "1");
        assert_eq!(state.assign_id("   "), "2");
        assert_eq!(state.assign_id("named"), "named");
        assert_eq!(state.assign_id(""), "3");
    }
}
