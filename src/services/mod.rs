// Core services: wallet identity, game catalog, score ledger and per-wallet stats.
pub mod aggregation;
pub mod game_catalog;
pub mod score_ledger;
pub mod wallet_registry;

pub use aggregation::AggregationView;
pub use game_catalog::GameCatalog;
pub use score_ledger::ScoreLedger;
pub use wallet_registry::WalletRegistry;
