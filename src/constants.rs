/// Application constants

pub const API_VERSION: &str = "v1";

// Column limits
pub const WALLET_ADDRESS_MAX_LEN: usize = 42;
pub const NICKNAME_MAX_LEN: usize = 50;

// Leaderboard
pub const LEADERBOARD_SIZE: i64 = 10;

// Default catalog, seeded by name
pub const DEFAULT_GAMES: &[(&str, &str)] = &[
    ("Click Game", "Click as many times as you can in 10 seconds!"),
    ("Memory Match", "Find all matching pairs with the fewest moves possible."),
    ("Word Scramble", "Unscramble words as quickly as you can."),
    ("Math Challenge", "Solve math problems against the clock."),
];
