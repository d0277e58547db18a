use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::models::{BlockSummary, ChainSnapshot, NormalizedTx};
use crate::poll_stats::{PollSnapshot, POLL_STATS};
use crate::poller::SharedSnapshot;

#[derive(Clone)]
pub struct AppState {
    pub snapshot: SharedSnapshot,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
struct RecentBlocksResponse {
    blocks: Vec<BlockSummary>,
}

#[derive(Serialize)]
struct RecentTxsResponse {
    transactions: Vec<NormalizedTx>,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// 503 until the first poll cycle lands; afterwards always the latest
/// successfully fetched snapshot, even if newer cycles have failed since.
async fn network_stats(State(state): State<AppState>) -> Result<Json<ChainSnapshot>, StatusCode> {
    match state.snapshot.read().await.clone() {
        Some(snapshot) => Ok(Json(snapshot)),
        None => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn recent_blocks(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<RecentBlocksResponse>, StatusCode> {
    let snapshot = state
        .snapshot
        .read()
        .await
        .clone()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let mut blocks = snapshot.recent_blocks;
    if let Some(limit) = query.limit {
        blocks.truncate(limit);
    }
    Ok(Json(RecentBlocksResponse { blocks }))
}

async fn recent_transactions(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<RecentTxsResponse>, StatusCode> {
    let snapshot = state
        .snapshot
        .read()
        .await
        .clone()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let mut transactions = snapshot.recent_transactions;
    if let Some(limit) = query.limit {
        transactions.truncate(limit);
    }
    Ok(Json(RecentTxsResponse { transactions }))
}

async fn poller_stats() -> Json<PollSnapshot> {
    Json(POLL_STATS.snapshot())
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stats/network", get(network_stats))
        .route("/stats/poller", get(poller_stats))
        .route("/blocks/recent", get(recent_blocks))
        .route("/tx/recent", get(recent_transactions))
        .with_state(state)
}

pub async fn run_http_server(addr: &str, state: AppState) -> Result<()> {
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
