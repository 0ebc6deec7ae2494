// src/models/mod.rs
pub mod game;
pub mod lenient;
pub mod wallet;

pub use game::{
    parse_game_id,
    Game,
    GameIdParam,
    GameSeed,
    LeaderboardQuery,
    NewScoreRecord,
    RecordGameRequest,
    ScoreRecord,
    SeedReport,
};
pub use wallet::{
    ConnectWalletRequest,
    UpdateNicknameRequest,
    Wallet,
    WalletDetail,
    WalletSummary,
};
