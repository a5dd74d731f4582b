//! Family members API endpoints

use api_types::transaction::TransactionListResponse;
use api_types::user::{ClaimProfile, Role as ApiRole, UserView};
use axum::{
    extract::{Path, State},
    Json,
};

use crate::transactions::view_of;
use crate::{server::ServerState, ServerError};

fn map_role(role: engine::Role) -> ApiRole {
    match role {
        engine::Role::Admin => ApiRole::Admin,
        engine::Role::Member => ApiRole::Member,
    }
}

fn view(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        name: user.name,
        balance_paise: user.balance.paise(),
        role: map_role(user.role),
        email: user.email,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<UserView>>, ServerError> {
    let users = state.ledger.users().await?.into_iter().map(view).collect();
    Ok(Json(users))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, ServerError> {
    Ok(Json(view(state.ledger.user(&id).await?)))
}

pub async fn history(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let transactions = state
        .ledger
        .user_transactions(&id)
        .await?
        .into_iter()
        .map(view_of)
        .collect();
    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn claim(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ClaimProfile>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.ledger.claim_profile(&id, &payload.email).await?;
    Ok(Json(view(user)))
}
