use std::net::SocketAddr;

use arcade_backend::{
    api,
    config::Config,
    constants::API_VERSION,
    db,
    init_tracing,
    services::GameCatalog,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Arcade Backend Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API Version: {}", API_VERSION);

    // Initialize storage (runs migrations for postgres)
    let storage = db::open(&config).await?;

    if config.seed_games_on_start {
        GameCatalog::new(storage.clone()).seed_defaults().await?;
    }

    let app_state = api::AppState::new(storage, config.clone());
    let app = api::app(app_state);

    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, api::into_make_service(app)).await?;

    Ok(())
}
