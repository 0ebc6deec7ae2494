use axum::{extract::State, http::HeaderMap, Json};

use crate::{
    error::Result,
    models::{ConnectWalletRequest, UpdateNicknameRequest, Wallet, WalletDetail},
};

use super::{
    extract::{JsonBody, PathParam},
    guard::MutationTarget,
    require_write, AppState,
};

/// GET /api/wallets
pub async fn list_wallets(State(state): State<AppState>) -> Result<Json<Vec<Wallet>>> {
    Ok(Json(state.wallets().list().await?))
}

/// POST /api/wallets/connect
pub async fn connect_wallet(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<ConnectWalletRequest>,
) -> Result<Json<Wallet>> {
    let address = req.address.as_deref();
    require_write(&headers, &state, MutationTarget::Connect { address })?;

    let wallet = state.wallets().connect(address).await?;
    Ok(Json(wallet))
}

/// GET /api/wallets/{address}
pub async fn get_wallet_detail(
    State(state): State<AppState>,
    PathParam(address): PathParam<String>,
) -> Result<Json<WalletDetail>> {
    let wallet = state.wallets().get(&address).await?;
    let detail = state.aggregation().detail(wallet).await?;
    Ok(Json(detail))
}

/// POST /api/wallets/{address}/update_nickname
pub async fn update_nickname(
    State(state): State<AppState>,
    headers: HeaderMap,
    PathParam(address): PathParam<String>,
    JsonBody(req): JsonBody<UpdateNicknameRequest>,
) -> Result<Json<Wallet>> {
    require_write(&headers, &state, MutationTarget::Nickname { address: &address })?;

    let wallet = state
        .wallets()
        .update_nickname(&address, req.nickname.as_deref())
        .await?;
    Ok(Json(wallet))
}
