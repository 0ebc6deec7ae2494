use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    error::Result,
    models::*,
};

mod memory;
mod postgres;

pub use memory::MemoryDatabase;
pub use postgres::Database;

pub type SharedStorage = Arc<dyn Storage>;

/// Persistence seam shared by the Postgres and in-memory backends.
///
/// `connect_wallet` and `insert_game_if_absent` must be atomic: concurrent
/// callers for the same address or name never produce two rows.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn ping(&self) -> Result<()>;

    // Wallets
    async fn connect_wallet(&self, address: &str) -> Result<Wallet>;
    async fn get_wallet(&self, address: &str) -> Result<Option<Wallet>>;
    async fn list_wallets(&self) -> Result<Vec<Wallet>>;
    async fn set_nickname(&self, address: &str, nickname: &str) -> Result<Option<Wallet>>;

    // Games
    async fn list_games(&self) -> Result<Vec<Game>>;
    async fn get_game(&self, id: i64) -> Result<Option<Game>>;
    /// Returns `true` when a row was inserted.
    async fn insert_game_if_absent(&self, name: &str, description: Option<&str>) -> Result<bool>;

    // Game history
    async fn insert_score(&self, record: &NewScoreRecord) -> Result<ScoreRecord>;
    async fn get_score(&self, id: i64) -> Result<Option<ScoreRecord>>;
    async fn list_scores(&self) -> Result<Vec<ScoreRecord>>;
    async fn scores_for_wallet(&self, wallet_id: i64) -> Result<Vec<ScoreRecord>>;
    async fn top_scores(&self, game_id: i64, limit: i64) -> Result<Vec<ScoreRecord>>;
}

pub async fn open(config: &Config) -> anyhow::Result<SharedStorage> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let db = Database::new(config).await?;
            tracing::info!("Running database migrations...");
            db.run_migrations().await?;
            Ok(Arc::new(db))
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Ok(Arc::new(MemoryDatabase::new()))
        }
    }
}
