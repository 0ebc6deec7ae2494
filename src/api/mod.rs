// src/api/mod.rs
pub mod extract;
pub mod game_history;
pub mod games;
pub mod guard;
pub mod health;
pub mod wallets;

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::Layer;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    db::SharedStorage,
    error::Result,
    services::{AggregationView, GameCatalog, ScoreLedger, WalletRegistry},
};
use guard::{Actor, AllowAll, BearerToken, MutationGuard, MutationTarget};

#[derive(Clone)]
pub struct AppState {
    pub db: SharedStorage,
    pub config: Config,
    pub guard: Arc<dyn MutationGuard>,
}

impl AppState {
    pub fn new(db: SharedStorage, config: Config) -> Self {
        let guard: Arc<dyn MutationGuard> = match config.write_api_token.as_deref() {
            Some(token) => Arc::new(BearerToken::new(token)),
            None => Arc::new(AllowAll),
        };
        Self { db, config, guard }
    }

    pub fn wallets(&self) -> WalletRegistry {
        WalletRegistry::new(self.db.clone())
    }

    pub fn games(&self) -> GameCatalog {
        GameCatalog::new(self.db.clone())
    }

    pub fn ledger(&self) -> ScoreLedger {
        ScoreLedger::new(self.db.clone())
    }

    pub fn aggregation(&self) -> AggregationView {
        AggregationView::new(self.db.clone())
    }
}

pub fn require_write(headers: &HeaderMap, state: &AppState, target: MutationTarget<'_>) -> Result<()> {
    let actor = Actor::from_headers(headers);
    state.guard.authorize(&actor, &target)
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_from_config(&state.config);

    Router::new()
        .route("/health", get(health::health_check))
        // Wallets
        .route("/api/wallets", get(wallets::list_wallets))
        .route("/api/wallets/connect", post(wallets::connect_wallet))
        .route("/api/wallets/{address}", get(wallets::get_wallet_detail))
        .route(
            "/api/wallets/{address}/update_nickname",
            post(wallets::update_nickname),
        )
        // Games
        .route("/api/games", get(games::list_games))
        .route("/api/games/{id}", get(games::get_game))
        // Game history
        .route("/api/game-history", get(game_history::list_records))
        .route(
            "/api/game-history/record_game",
            post(game_history::record_game),
        )
        .route(
            "/api/game-history/leaderboard",
            get(game_history::leaderboard),
        )
        .route("/api/game-history/{id}", get(game_history::get_record))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Router wrapped so `/api/wallets/connect/` and `/api/wallets/connect`
/// reach the same handler.
pub fn app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}

pub type App = NormalizePath<Router>;

pub fn into_make_service(app: App) -> axum::routing::IntoMakeService<App> {
    axum::ServiceExt::<Request>::into_make_service(app)
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
