use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::{
    error::{AppError, Result},
    models::{parse_game_id, LeaderboardQuery, RecordGameRequest, ScoreRecord},
};

use super::{
    extract::{JsonBody, PathParam},
    guard::MutationTarget,
    require_write, AppState,
};

/// GET /api/game-history
pub async fn list_records(State(state): State<AppState>) -> Result<Json<Vec<ScoreRecord>>> {
    Ok(Json(state.ledger().list().await?))
}

/// GET /api/game-history/{id}
pub async fn get_record(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ScoreRecord>> {
    Ok(Json(state.ledger().get(id).await?))
}

/// POST /api/game-history/record_game
pub async fn record_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<RecordGameRequest>,
) -> Result<(StatusCode, Json<ScoreRecord>)> {
    let wallet_address = req.wallet_address.as_deref();
    require_write(&headers, &state, MutationTarget::RecordGame { wallet_address })?;

    let game_id = req.game_id.as_ref().map(|id| id.resolve()).transpose()?;
    let record = state
        .ledger()
        .record(wallet_address, game_id, req.score, req.data)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/game-history/leaderboard?game_id=
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<ScoreRecord>>> {
    let raw = query
        .game_id
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation("game_id parameter is required".to_string()))?;
    let game_id = parse_game_id(raw)?;

    Ok(Json(state.ledger().leaderboard(game_id).await?))
}
