//! HTTP surface for pattern reports.
//!
//! The auth layer in front of this service resolves the session and forwards
//! the current user in the `x-user-id` header. Every report request answers
//! 200; data problems degrade to the fallback week inside the aggregator.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::analyzer::{PatternAggregator, PatternReport};

pub const USER_HEADER: &str = "x-user-id";

/// Shared state for request handlers.
pub struct AppState {
    pub aggregator: PatternAggregator,
}

/// Query parameters for the pattern report.
#[derive(Debug, Default, Deserialize)]
pub struct PatternsQuery {
    #[serde(default)]
    pub refresh: Option<String>,
}

impl PatternsQuery {
    fn wants_refresh(&self) -> bool {
        matches!(self.refresh.as_deref(), Some("true") | Some("1"))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/insights/patterns", get(patterns))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `bind_address` and serves until the process is stopped.
pub async fn serve(bind_address: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_address).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}

async fn health() -> &'static str {
    "ok"
}

async fn patterns(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<PatternsQuery>,
) -> Json<PatternReport> {
    let user_id = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if query.wants_refresh() {
        debug!("Refresh requested; reports are always computed fresh");
    }

    let report = state.aggregator.report_for(user_id, Utc::now().date_naive()).await;
    Json(report)
}
