use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::lenient::{optional_integer, optional_text};
use crate::error::{AppError, Result};

// ==================== GAME ====================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSeed {
    pub name: String,
    pub description: Option<String>,
}

impl GameSeed {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
}

// ==================== SCORE RECORD ====================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ScoreRecord {
    pub id: i64,
    pub wallet: i64,
    pub wallet_address: String,
    pub game: i64,
    pub game_name: String,
    pub score: i64,
    pub played_at: DateTime<Utc>,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct NewScoreRecord {
    pub wallet_id: i64,
    pub game_id: i64,
    pub score: i64,
    pub data: serde_json::Value,
}

// ==================== REQUESTS ====================

/// Game ids arrive either as JSON numbers or as numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GameIdParam {
    Number(i64),
    Text(String),
}

impl GameIdParam {
    pub fn resolve(&self) -> Result<i64> {
        match self {
            GameIdParam::Number(id) => Ok(*id),
            GameIdParam::Text(raw) => parse_game_id(raw),
        }
    }
}

pub fn parse_game_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation(format!("game_id must be an integer, got '{}'", raw)))
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordGameRequest {
    #[serde(default, deserialize_with = "optional_text")]
    pub wallet_address: Option<String>,
    pub game_id: Option<GameIdParam>,
    #[serde(default, deserialize_with = "optional_integer")]
    pub score: Option<i64>,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub game_id: Option<String>,
}
