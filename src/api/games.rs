use axum::{extract::State, Json};

use crate::{
    error::Result,
    models::{parse_game_id, Game},
};

use super::{extract::PathParam, AppState};

/// GET /api/games
pub async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<Game>>> {
    Ok(Json(state.games().list().await?))
}

/// GET /api/games/{id}
pub async fn get_game(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<Game>> {
    let id = parse_game_id(&id)?;
    Ok(Json(state.games().get(id).await?))
}
