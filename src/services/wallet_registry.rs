use crate::{
    constants::{NICKNAME_MAX_LEN, WALLET_ADDRESS_MAX_LEN},
    db::SharedStorage,
    error::{AppError, Result},
    models::Wallet,
};

/// Owns the wallet lifecycle: registration on connect and nickname edits.
pub struct WalletRegistry {
    db: SharedStorage,
}

impl WalletRegistry {
    pub fn new(db: SharedStorage) -> Self {
        Self { db }
    }

    /// Registers `address` on first sight, otherwise bumps its connection
    /// counter and refreshes `last_connection`.
    pub async fn connect(&self, address: Option<&str>) -> Result<Wallet> {
        let address = normalize_address(address)?;
        let wallet = self.db.connect_wallet(address).await?;

        if wallet.connection_count == 1 {
            tracing::info!("Registered new wallet {}", wallet.address);
        } else {
            tracing::debug!(
                "Wallet {} reconnected ({} connections)",
                wallet.address,
                wallet.connection_count
            );
        }
        Ok(wallet)
    }

    /// Overwrites the nickname with the value exactly as sent. An empty or
    /// missing nickname leaves the stored value alone.
    pub async fn update_nickname(&self, address: &str, nickname: Option<&str>) -> Result<Wallet> {
        let wallet = self.get(address).await?;
        let Some(nickname) = nickname.filter(|n| !n.is_empty()) else {
            return Ok(wallet);
        };

        if nickname.chars().count() > NICKNAME_MAX_LEN {
            return Err(AppError::Validation(format!(
                "nickname must be at most {} characters",
                NICKNAME_MAX_LEN
            )));
        }

        let wallet = self
            .db
            .set_nickname(&wallet.address, nickname)
            .await?
            .ok_or_else(AppError::wallet_not_found)?;

        tracing::info!("Wallet {} nickname set to {}", wallet.address, nickname);
        Ok(wallet)
    }

    pub async fn get(&self, address: &str) -> Result<Wallet> {
        self.db
            .get_wallet(address)
            .await?
            .ok_or_else(AppError::wallet_not_found)
    }

    pub async fn list(&self) -> Result<Vec<Wallet>> {
        self.db.list_wallets().await
    }
}

fn normalize_address(raw: Option<&str>) -> Result<&str> {
    let address = raw
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Wallet address is required".to_string()))?;

    if address.chars().count() > WALLET_ADDRESS_MAX_LEN {
        return Err(AppError::Validation(format!(
            "Wallet address must be at most {} characters",
            WALLET_ADDRESS_MAX_LEN
        )));
    }
    Ok(address)
}
