use serde_json::{Map, Value};

use crate::{
    constants::LEADERBOARD_SIZE,
    db::SharedStorage,
    error::{AppError, Result},
    models::{NewScoreRecord, ScoreRecord},
};

/// Append-only record of game plays. Records hold references to a wallet and
/// a game but never own them.
pub struct ScoreLedger {
    db: SharedStorage,
}

impl ScoreLedger {
    pub fn new(db: SharedStorage) -> Self {
        Self { db }
    }

    /// Appends one play. The wallet is resolved before the game, and nothing
    /// is written unless both exist. Scores are stored as submitted.
    pub async fn record(
        &self,
        wallet_address: Option<&str>,
        game_id: Option<i64>,
        score: Option<i64>,
        data: Option<Value>,
    ) -> Result<ScoreRecord> {
        let data = normalize_data(data)?;

        let wallet = match wallet_address {
            Some(address) => self.db.get_wallet(address).await?,
            None => None,
        }
        .ok_or_else(AppError::wallet_not_found)?;

        let game = match game_id {
            Some(id) => self.db.get_game(id).await?,
            None => None,
        }
        .ok_or_else(AppError::game_not_found)?;

        let record = self
            .db
            .insert_score(&NewScoreRecord {
                wallet_id: wallet.id,
                game_id: game.id,
                score: score.unwrap_or(0),
                data,
            })
            .await?;

        tracing::info!(
            "Recorded {} for {} on {}",
            record.score,
            record.wallet_address,
            record.game_name
        );
        Ok(record)
    }

    /// Top scores for one game, highest first. Equal scores keep the order in
    /// which they were recorded.
    pub async fn leaderboard(&self, game_id: i64) -> Result<Vec<ScoreRecord>> {
        if self.db.get_game(game_id).await?.is_none() {
            return Err(AppError::game_not_found());
        }
        self.db.top_scores(game_id, LEADERBOARD_SIZE).await
    }

    pub async fn get(&self, id: i64) -> Result<ScoreRecord> {
        self.db
            .get_score(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Game record not found".to_string()))
    }

    /// Every record, newest first.
    pub async fn list(&self) -> Result<Vec<ScoreRecord>> {
        self.db.list_scores().await
    }

    pub async fn history_for_wallet(&self, wallet_id: i64) -> Result<Vec<ScoreRecord>> {
        self.db.scores_for_wallet(wallet_id).await
    }
}

fn normalize_data(data: Option<Value>) -> Result<Value> {
    match data {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(value @ Value::Object(_)) => Ok(value),
        Some(_) => Err(AppError::Validation(
            "data must be a JSON object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryDatabase, Storage};
    use serde_json::json;
    use std::sync::Arc;

    async fn ledger_with_player() -> (Arc<MemoryDatabase>, ScoreLedger) {
        let db = Arc::new(MemoryDatabase::new());
        db.connect_wallet("0xplayer").await.unwrap();
        db.insert_game_if_absent("Click Game", None).await.unwrap();
        db.insert_game_if_absent("Memory Match", None).await.unwrap();
        let ledger = ScoreLedger::new(db.clone());
        (db, ledger)
    }

    #[tokio::test]
    async fn record_defaults_score_and_data() {
        let (_, ledger) = ledger_with_player().await;
        let record = ledger
            .record(Some("0xplayer"), Some(1), None, None)
            .await
            .unwrap();

        assert_eq!(record.score, 0);
        assert_eq!(record.data, json!({}));
        assert_eq!(record.game_name, "Click Game");
        assert_eq!(record.wallet_address, "0xplayer");
    }

    #[tokio::test]
    async fn record_accepts_negative_and_huge_scores() {
        let (_, ledger) = ledger_with_player().await;
        let low = ledger
            .record(Some("0xplayer"), Some(1), Some(-40), None)
            .await
            .unwrap();
        let high = ledger
            .record(Some("0xplayer"), Some(1), Some(i64::MAX), Some(json!({"clicks": 9})))
            .await
            .unwrap();

        assert_eq!(low.score, -40);
        assert_eq!(high.score, i64::MAX);
        assert_eq!(high.data["clicks"], 9);
    }

    #[tokio::test]
    async fn unknown_wallet_writes_nothing() {
        let (db, ledger) = ledger_with_player().await;
        let before = db.list_scores().await.unwrap().len();

        let err = ledger
            .record(Some("doesnotexist"), Some(1), Some(10), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg.contains("Wallet")));

        assert_eq!(db.list_scores().await.unwrap().len(), before);
    }

    #[tokio::test]
    async fn unknown_game_writes_nothing() {
        let (db, ledger) = ledger_with_player().await;

        let err = ledger
            .record(Some("0xplayer"), Some(42), Some(10), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg.contains("Game")));

        let missing = ledger
            .record(Some("0xplayer"), None, Some(10), None)
            .await
            .unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));

        assert!(db.list_scores().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn wallet_is_checked_before_game() {
        let (_, ledger) = ledger_with_player().await;
        let err = ledger
            .record(None, Some(42), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg.contains("Wallet")));
    }

    #[tokio::test]
    async fn non_object_data_is_rejected() {
        let (db, ledger) = ledger_with_player().await;
        let err = ledger
            .record(Some("0xplayer"), Some(1), Some(1), Some(json!([1, 2])))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(db.list_scores().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn leaderboard_is_bounded_and_ordered() {
        let (_, ledger) = ledger_with_player().await;
        let scores = [5, 90, 3, 77, 12, 64, 8, 41, 99, 23, 56, 1, 70, 35, 18];
        for score in scores {
            ledger
                .record(Some("0xplayer"), Some(1), Some(score), None)
                .await
                .unwrap();
        }
        // Another game's scores stay out of the board.
        ledger
            .record(Some("0xplayer"), Some(2), Some(1_000), None)
            .await
            .unwrap();

        let board = ledger.leaderboard(1).await.unwrap();
        assert_eq!(board.len(), LEADERBOARD_SIZE as usize);
        assert!(board.windows(2).all(|pair| pair[0].score >= pair[1].score));
        assert_eq!(board[0].score, 99);
        assert!(board.iter().all(|r| r.game == 1));

        let mut expected: Vec<i64> = scores.to_vec();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        expected.truncate(10);
        let got: Vec<i64> = board.iter().map(|r| r.score).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn leaderboard_for_unknown_game_is_not_found() {
        let (_, ledger) = ledger_with_player().await;
        assert!(matches!(
            ledger.leaderboard(404).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (_, ledger) = ledger_with_player().await;
        for score in [1, 2, 3] {
            ledger
                .record(Some("0xplayer"), Some(1), Some(score), None)
                .await
                .unwrap();
        }
        let scores: Vec<i64> = ledger.list().await.unwrap().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![3, 2, 1]);
        assert_eq!(ledger.get(1).await.unwrap().score, 1);
        assert!(matches!(ledger.get(10).await, Err(AppError::NotFound(_))));
    }
}
