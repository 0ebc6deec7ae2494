use crate::{
    constants::DEFAULT_GAMES,
    db::SharedStorage,
    error::{AppError, Result},
    models::{Game, GameSeed, SeedReport},
};

pub struct GameCatalog {
    db: SharedStorage,
}

impl GameCatalog {
    pub fn new(db: SharedStorage) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Game>> {
        self.db.list_games().await
    }

    pub async fn get(&self, id: i64) -> Result<Game> {
        self.db
            .get_game(id)
            .await?
            .ok_or_else(AppError::game_not_found)
    }

    /// Inserts each seed whose name is not in the catalog yet. Games that
    /// already exist are left exactly as they are.
    pub async fn seed(&self, seeds: &[GameSeed]) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for seed in seeds {
            let created = self
                .db
                .insert_game_if_absent(&seed.name, seed.description.as_deref())
                .await?;

            if created {
                tracing::info!("Created game: {}", seed.name);
                report.created.push(seed.name.clone());
            } else {
                tracing::debug!("Game already exists: {}", seed.name);
                report.existing.push(seed.name.clone());
            }
        }

        tracing::info!(
            "Game catalog loaded ({} created, {} existing)",
            report.created.len(),
            report.existing.len()
        );
        Ok(report)
    }

    pub async fn seed_defaults(&self) -> Result<SeedReport> {
        self.seed(&default_games()).await
    }
}

pub fn default_games() -> Vec<GameSeed> {
    DEFAULT_GAMES
        .iter()
        .map(|(name, description)| GameSeed::new(name, description))
        .collect()
}
