//! Transactions API endpoints

use api_types::transaction::{
    CommentNew, CommentView, TransactionCreated, TransactionListQuery, TransactionListResponse,
    TransactionNew, TransactionView,
};
use api_types::TransactionKind as ApiKind;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, NaiveTime};

use crate::{server::ServerState, ServerError};

pub(crate) fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Expense => ApiKind::Expense,
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Investment => ApiKind::Investment,
        engine::TransactionKind::Transfer => ApiKind::Transfer,
        engine::TransactionKind::Profit => ApiKind::Profit,
        engine::TransactionKind::ReturnOfPrincipal => ApiKind::ReturnOfPrincipal,
    }
}

pub(crate) fn map_api_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Expense => engine::TransactionKind::Expense,
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Investment => engine::TransactionKind::Investment,
        ApiKind::Transfer => engine::TransactionKind::Transfer,
        ApiKind::Profit => engine::TransactionKind::Profit,
        ApiKind::ReturnOfPrincipal => engine::TransactionKind::ReturnOfPrincipal,
    }
}

/// Date-only input becomes a midnight UTC timestamp.
pub(crate) fn day_start(date: NaiveDate) -> chrono::DateTime<chrono::Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn draft_from(payload: TransactionNew) -> engine::TransactionDraft {
    engine::TransactionDraft {
        kind: map_api_kind(payload.kind),
        amount: engine::MoneyPaise::new(payload.amount_paise),
        date: day_start(payload.date),
        user: payload.user,
        to: payload.to,
        description: payload.description.unwrap_or_default(),
        category: payload.category.unwrap_or_default(),
    }
}

pub(crate) fn view_of(tx: engine::Transaction) -> TransactionView {
    let description = tx.display_description().to_string();
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        amount_paise: tx.amount.paise(),
        date: tx.date,
        user: tx.user,
        to: tx.to,
        description,
        category: tx.category,
        comments: tx
            .comments
            .into_iter()
            .map(|comment| CommentView {
                id: comment.id,
                text: comment.text,
                author_id: comment.author_id,
                author_name: comment.author_name,
                at: comment.at,
            })
            .collect(),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(payload): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let filter = engine::TransactionFilter {
        user: payload.user,
        kind: payload.kind.map(map_api_kind),
        limit: payload.limit,
    };

    let transactions = state
        .ledger
        .list_transactions(&filter)
        .await?
        .into_iter()
        .map(view_of)
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let id = state.ledger.create_transaction(draft_from(payload)).await?;
    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TransactionNew>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .update_transaction(&id, draft_from(payload))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.ledger.delete_transaction(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn comment_new(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CommentNew>,
) -> Result<(StatusCode, Json<CommentView>), ServerError> {
    let comment = state
        .ledger
        .add_comment(&id, &payload.author_id, &payload.text)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CommentView {
            id: comment.id,
            text: comment.text,
            author_id: comment.author_id,
            author_name: comment.author_name,
            at: comment.at,
        }),
    ))
}
