use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::Storage;
use crate::{config::Config, error::Result, models::*};

const WALLET_COLUMNS: &str =
    "id, address, nickname, first_connection, last_connection, connection_count";

const SCORE_SELECT: &str = r#"
    SELECT h.id,
           h.wallet_id AS wallet,
           w.address   AS wallet_address,
           h.game_id   AS game,
           g.name      AS game_name,
           h.score,
           h.played_at,
           h.data
    FROM game_history h
    JOIN wallets w ON w.id = h.wallet_id
    JOIN games g ON g.id = h.game_id
"#;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

// ==================== WALLET QUERIES ====================
#[async_trait]
impl Storage for Database {
    async fn ping(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    async fn connect_wallet(&self, address: &str) -> Result<Wallet> {
        // Single statement: the unique index on address decides create vs. increment.
        let sql = format!(
            r#"
            INSERT INTO wallets (address)
            VALUES ($1)
            ON CONFLICT (address) DO UPDATE
            SET connection_count = wallets.connection_count + 1,
                last_connection  = NOW()
            RETURNING {WALLET_COLUMNS}
            "#
        );
        let wallet = sqlx::query_as::<_, Wallet>(&sql)
            .bind(address)
            .fetch_one(&self.pool)
            .await?;
        Ok(wallet)
    }

    async fn get_wallet(&self, address: &str) -> Result<Option<Wallet>> {
        let sql = format!("SELECT {WALLET_COLUMNS} FROM wallets WHERE address = $1");
        let wallet = sqlx::query_as::<_, Wallet>(&sql)
            .bind(address)
            .fetch_optional(&self.pool)
            .await?;
        Ok(wallet)
    }

    async fn list_wallets(&self) -> Result<Vec<Wallet>> {
        let sql = format!("SELECT {WALLET_COLUMNS} FROM wallets ORDER BY id ASC");
        let wallets = sqlx::query_as::<_, Wallet>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(wallets)
    }

    async fn set_nickname(&self, address: &str, nickname: &str) -> Result<Option<Wallet>> {
        let sql = format!(
            "UPDATE wallets SET nickname = $2 WHERE address = $1 RETURNING {WALLET_COLUMNS}"
        );
        let wallet = sqlx::query_as::<_, Wallet>(&sql)
            .bind(address)
            .bind(nickname)
            .fetch_optional(&self.pool)
            .await?;
        Ok(wallet)
    }

    // ==================== GAME QUERIES ====================

    async fn list_games(&self) -> Result<Vec<Game>> {
        let games = sqlx::query_as::<_, Game>(
            "SELECT id, name, description FROM games ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(games)
    }

    async fn get_game(&self, id: i64) -> Result<Option<Game>> {
        let game = sqlx::query_as::<_, Game>(
            "SELECT id, name, description FROM games WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(game)
    }

    async fn insert_game_if_absent(&self, name: &str, description: Option<&str>) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO games (name, description) VALUES ($1, $2)
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    // ==================== GAME HISTORY QUERIES ====================

    async fn insert_score(&self, record: &NewScoreRecord) -> Result<ScoreRecord> {
        let row = sqlx::query_as::<_, ScoreRecord>(
            r#"
            WITH h AS (
                INSERT INTO game_history (wallet_id, game_id, score, data)
                VALUES ($1, $2, $3, $4)
                RETURNING id, wallet_id, game_id, score, played_at, data
            )
            SELECT h.id,
                   h.wallet_id AS wallet,
                   w.address   AS wallet_address,
                   h.game_id   AS game,
                   g.name      AS game_name,
                   h.score,
                   h.played_at,
                   h.data
            FROM h
            JOIN wallets w ON w.id = h.wallet_id
            JOIN games g ON g.id = h.game_id
            "#,
        )
        .bind(record.wallet_id)
        .bind(record.game_id)
        .bind(record.score)
        .bind(&record.data)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_score(&self, id: i64) -> Result<Option<ScoreRecord>> {
        let sql = format!("{SCORE_SELECT} WHERE h.id = $1");
        let row = sqlx::query_as::<_, ScoreRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_scores(&self) -> Result<Vec<ScoreRecord>> {
        let sql = format!("{SCORE_SELECT} ORDER BY h.played_at DESC, h.id DESC");
        let rows = sqlx::query_as::<_, ScoreRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn scores_for_wallet(&self, wallet_id: i64) -> Result<Vec<ScoreRecord>> {
        let sql = format!(
            "{SCORE_SELECT} WHERE h.wallet_id = $1 ORDER BY h.played_at DESC, h.id DESC"
        );
        let rows = sqlx::query_as::<_, ScoreRecord>(&sql)
            .bind(wallet_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn top_scores(&self, game_id: i64, limit: i64) -> Result<Vec<ScoreRecord>> {
        // Ties keep insertion order.
        let sql = format!(
            "{SCORE_SELECT} WHERE h.game_id = $1 ORDER BY h.score DESC, h.id ASC LIMIT $2"
        );
        let rows = sqlx::query_as::<_, ScoreRecord>(&sql)
            .bind(game_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
