use std::collections::BTreeMap;

use crate::{
    db::SharedStorage,
    error::Result,
    models::{Game, ScoreRecord, Wallet, WalletDetail, WalletSummary},
};

use super::ScoreLedger;

/// Read-only statistics over a wallet's plays, rebuilt on every call.
pub struct AggregationView {
    db: SharedStorage,
    ledger: ScoreLedger,
}

impl AggregationView {
    pub fn new(db: SharedStorage) -> Self {
        Self {
            ledger: ScoreLedger::new(db.clone()),
            db,
        }
    }

    pub async fn summary(&self, wallet: &Wallet) -> Result<WalletSummary> {
        let catalog = self.db.list_games().await?;
        let history = self.ledger.history_for_wallet(wallet.id).await?;
        Ok(summarize(&catalog, &history))
    }

    /// Wallet fields plus its history (newest first) and summary.
    pub async fn detail(&self, wallet: Wallet) -> Result<WalletDetail> {
        let catalog = self.db.list_games().await?;
        let history = self.ledger.history_for_wallet(wallet.id).await?;
        let summary = summarize(&catalog, &history);

        Ok(WalletDetail {
            wallet,
            game_history: history,
            summary,
        })
    }
}

/// Every catalog game gets an entry; games never played score 0.
pub fn summarize(catalog: &[Game], history: &[ScoreRecord]) -> WalletSummary {
    let mut high_scores = BTreeMap::new();
    for game in catalog {
        let best = history
            .iter()
            .filter(|record| record.game == game.id)
            .map(|record| record.score)
            .max()
            .unwrap_or(0);
        high_scores.insert(game.name.clone(), best);
    }

    WalletSummary {
        total_games_played: history.len() as i64,
        high_scores,
    }
}
