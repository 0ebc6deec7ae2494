use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

use super::{game::ScoreRecord, lenient::optional_text};

// ==================== WALLET ====================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Wallet {
    pub id: i64,
    pub address: String,
    pub nickname: Option<String>,
    pub first_connection: DateTime<Utc>,
    pub last_connection: DateTime<Utc>,
    pub connection_count: i64,
}

/// Per-wallet statistics derived from the score ledger. Never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WalletSummary {
    pub total_games_played: i64,
    pub high_scores: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletDetail {
    #[serde(flatten)]
    pub wallet: Wallet,
    pub game_history: Vec<ScoreRecord>,
    #[serde(flatten)]
    pub summary: WalletSummary,
}

// ==================== REQUESTS ====================
#[derive(Debug, Default, Deserialize)]
pub struct ConnectWalletRequest {
    #[serde(default, deserialize_with = "optional_text")]
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNicknameRequest {
    #[serde(default, deserialize_with = "optional_text")]
    pub nickname: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_detail_flattens_wallet_and_summary() {
        let now = Utc::now();
        let detail = WalletDetail {
            wallet: Wallet {
                id: 7,
                address: "0xabc".to_string(),
                nickname: None,
                first_connection: now,
                last_connection: now,
                connection_count: 3,
            },
            game_history: Vec::new(),
            summary: WalletSummary {
                total_games_played: 0,
                high_scores: BTreeMap::from([("Click Game".to_string(), 0)]),
            },
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["address"], "0xabc");
        assert_eq!(json["connection_count"], 3);
        assert_eq!(json["total_games_played"], 0);
        assert_eq!(json["high_scores"]["Click Game"], 0);
        assert!(json["game_history"].as_array().unwrap().is_empty());
        assert!(json.get("wallet").is_none());
    }
}
