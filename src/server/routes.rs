//! Route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::analysis::TradeAnalysisRequest;
use crate::error::ApiError;
use crate::players::PlayerCollection;
use crate::server::html::render_grid_table;
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PlayersQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}

/// `GET /api/players?sort=<field>&order=asc|desc`
#[instrument(skip(state))]
pub async fn list_players(
    State(state): State<AppState>,
    Query(query): Query<PlayersQuery>,
) -> Result<Json<PlayerCollection>, ApiError> {
    let players = state
        .store
        .list_players(query.sort.as_deref(), query.order.as_deref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load player data");
            ApiError::from(e)
        })?;

    info!(count = players.len(), "Serving player list");
    Ok(Json(players))
}

/// `POST /api/analyze-trade`
pub async fn analyze_trade(
    State(state): State<AppState>,
    payload: Result<Json<TradeAnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        info!(error = %rejection, "Malformed trade analysis body");
        ApiError::Validation(rejection.body_text())
    })?;

    let analysis = state.analyzer.analyze(&request).await?;
    Ok(Json(AnalysisResponse { analysis }))
}

/// `GET /htmltable`: the last fetched grid as-is. Empty before the first fetch.
pub async fn html_table(State(state): State<AppState>) -> Html<String> {
    match state.store.raw_grid().await {
        Some(grid) => Html(render_grid_table(&grid)),
        None => Html(render_grid_table(&[])),
    }
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.health.report().await)
}
