use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::Storage;
use crate::{
    error::{AppError, Result},
    models::*,
};

#[derive(Default)]
struct Tables {
    wallets: Vec<Wallet>,
    wallet_index: HashMap<String, usize>,
    games: Vec<Game>,
    history: Vec<ScoreRecord>,
}

impl Tables {
    fn wallet(&self, address: &str) -> Option<&Wallet> {
        self.wallet_index.get(address).map(|&idx| &self.wallets[idx])
    }

    fn wallet_by_id(&self, id: i64) -> Option<&Wallet> {
        self.wallets.iter().find(|w| w.id == id)
    }

    fn game(&self, id: i64) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }
}

/// Process-local storage. Every mutation happens under one write lock, which
/// gives the same atomicity the Postgres backend gets from its unique indexes.
#[derive(Default)]
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryDatabase {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn connect_wallet(&self, address: &str) -> Result<Wallet> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        if let Some(&idx) = tables.wallet_index.get(address) {
            let wallet = &mut tables.wallets[idx];
            wallet.connection_count += 1;
            wallet.last_connection = now;
            return Ok(wallet.clone());
        }

        let wallet = Wallet {
            id: tables.wallets.len() as i64 + 1,
            address: address.to_string(),
            nickname: None,
            first_connection: now,
            last_connection: now,
            connection_count: 1,
        };
        let idx = tables.wallets.len();
        tables.wallets.push(wallet.clone());
        tables.wallet_index.insert(address.to_string(), idx);
        Ok(wallet)
    }

    async fn get_wallet(&self, address: &str) -> Result<Option<Wallet>> {
        let tables = self.tables.read().await;
        Ok(tables.wallet(address).cloned())
    }

    async fn list_wallets(&self) -> Result<Vec<Wallet>> {
        let tables = self.tables.read().await;
        Ok(tables.wallets.clone())
    }

    async fn set_nickname(&self, address: &str, nickname: &str) -> Result<Option<Wallet>> {
        let mut tables = self.tables.write().await;
        let Some(&idx) = tables.wallet_index.get(address) else {
            return Ok(None);
        };
        let wallet = &mut tables.wallets[idx];
        wallet.nickname = Some(nickname.to_string());
        Ok(Some(wallet.clone()))
    }

    async fn list_games(&self) -> Result<Vec<Game>> {
        let tables = self.tables.read().await;
        Ok(tables.games.clone())
    }

    async fn get_game(&self, id: i64) -> Result<Option<Game>> {
        let tables = self.tables.read().await;
        Ok(tables.game(id).cloned())
    }

    async fn insert_game_if_absent(&self, name: &str, description: Option<&str>) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.games.iter().any(|g| g.name == name) {
            return Ok(false);
        }
        let game = Game {
            id: tables.games.len() as i64 + 1,
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        tables.games.push(game);
        Ok(true)
    }

    async fn insert_score(&self, record: &NewScoreRecord) -> Result<ScoreRecord> {
        let mut tables = self.tables.write().await;

        // Mirrors the foreign keys on game_history.
        let wallet_address = tables
            .wallet_by_id(record.wallet_id)
            .map(|w| w.address.clone())
            .ok_or_else(AppError::wallet_not_found)?;
        let game_name = tables
            .game(record.game_id)
            .map(|g| g.name.clone())
            .ok_or_else(AppError::game_not_found)?;

        let stored = ScoreRecord {
            id: tables.history.len() as i64 + 1,
            wallet: record.wallet_id,
            wallet_address,
            game: record.game_id,
            game_name,
            score: record.score,
            played_at: Utc::now(),
            data: record.data.clone(),
        };
        tables.history.push(stored.clone());
        Ok(stored)
    }

    async fn get_score(&self, id: i64) -> Result<Option<ScoreRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.history.iter().find(|r| r.id == id).cloned())
    }

    async fn list_scores(&self) -> Result<Vec<ScoreRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.history.iter().rev().cloned().collect())
    }

    async fn scores_for_wallet(&self, wallet_id: i64) -> Result<Vec<ScoreRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .history
            .iter()
            .rev()
            .filter(|r| r.wallet == wallet_id)
            .cloned()
            .collect())
    }

    async fn top_scores(&self, game_id: i64, limit: i64) -> Result<Vec<ScoreRecord>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<ScoreRecord> = tables
            .history
            .iter()
            .filter(|r| r.game == game_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order between equal scores.
        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn connect_creates_then_increments() {
        let db = MemoryDatabase::new();
        let first = db.connect_wallet("0xabc").await.unwrap();
        assert_eq!(first.connection_count, 1);
        assert_eq!(first.first_connection, first.last_connection);

        let second = db.connect_wallet("0xabc").await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.connection_count, 2);
        assert_eq!(second.first_connection, first.first_connection);
        assert!(second.last_connection >= first.last_connection);
    }

    #[tokio::test]
    async fn addresses_are_case_sensitive() {
        let db = MemoryDatabase::new();
        db.connect_wallet("0xABC").await.unwrap();
        db.connect_wallet("0xabc").await.unwrap();
        assert_eq!(db.list_wallets().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn insert_score_rejects_dangling_references() {
        let db = MemoryDatabase::new();
        let result = db
            .insert_score(&NewScoreRecord {
                wallet_id: 1,
                game_id: 1,
                score: 5,
                data: json!({}),
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(db.list_scores().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn top_scores_breaks_ties_by_insertion_order() {
        let db = MemoryDatabase::new();
        let wallet = db.connect_wallet("0x1").await.unwrap();
        db.insert_game_if_absent("Click Game", None).await.unwrap();

        for score in [10, 30, 10, 30] {
            db.insert_score(&NewScoreRecord {
                wallet_id: wallet.id,
                game_id: 1,
                score,
                data: json!({}),
            })
            .await
            .unwrap();
        }

        let ids: Vec<i64> = db
            .top_scores(1, 10)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }
}
