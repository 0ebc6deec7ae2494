//! Seeds the default game catalog. Safe to run repeatedly: games that already
//! exist, matched by name, are left untouched.

use arcade_backend::{
    config::{Config, StorageBackend},
    db,
    init_tracing,
    services::GameCatalog,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    config.validate()?;

    if config.storage_backend == StorageBackend::Memory {
        tracing::warn!("STORAGE_BACKEND=memory: seeded games vanish when this process exits");
    }

    let storage = db::open(&config).await?;
    let report = GameCatalog::new(storage).seed_defaults().await?;

    for name in &report.existing {
        tracing::warn!("Game already exists: {}", name);
    }
    tracing::info!(
        "Successfully loaded game data ({} new)",
        report.created.len()
    );

    Ok(())
}
