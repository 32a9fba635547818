// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
//   GET /                 indicator snapshot for ?symbol=&interval=&limit=
//   GET /api/v1/health    liveness probe
//
// CORS is configured permissively; the service is read-only.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::market_data::KlineRequest;
use crate::snapshot::{compute_snapshot, Snapshot};
use crate::types::Interval;

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(snapshot))
        .route("/api/v1/health", get(health))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Snapshot
// =============================================================================

/// Raw query parameters; validated into a [`KlineRequest`].
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotQuery {
    symbol: Option<String>,
    interval: Option<String>,
    limit: Option<String>,
}

impl SnapshotQuery {
    /// Apply configured defaults to missing parameters and validate the rest.
    fn into_request(self, config: &ServiceConfig) -> Result<KlineRequest, ApiError> {
        let symbol = self
            .symbol
            .unwrap_or_else(|| config.default_symbol.clone());
        if symbol.trim().is_empty() {
            return Err(ApiError::BadRequest("symbol must not be empty".to_string()));
        }

        let interval = match self.interval {
            Some(raw) => raw.parse::<Interval>().map_err(ApiError::BadRequest)?,
            None => config.default_interval,
        };

        let limit = match self.limit {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ApiError::BadRequest(format!(
                        "invalid limit '{raw}'. Use a positive integer"
                    )))
                }
            },
            None => config.default_limit,
        };

        Ok(KlineRequest {
            symbol,
            interval,
            limit,
        })
    }
}

async fn snapshot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotQuery>,
) -> Result<Json<Snapshot>, ApiError> {
    let request = query.into_request(&state.config)?;

    // A failed fetch degrades to an empty sequence: the caller still gets a
    // well-formed snapshot with absent readings.
    let candles = match state.candle_source.fetch_candles(&request).await {
        Ok(candles) => candles,
        Err(e) => {
            warn!(
                symbol = %request.symbol,
                interval = %request.interval,
                error = %e,
                "candle fetch failed, serving empty snapshot"
            );
            Vec::new()
        }
    };

    let snapshot = compute_snapshot(
        &request.symbol,
        request.interval,
        &candles,
        state.display_offset(),
    )?;

    info!(
        symbol = %snapshot.symbol,
        interval = %snapshot.interval,
        candles = candles.len(),
        trend = %snapshot.trend,
        "snapshot served"
    );

    Ok(Json(snapshot))
}
