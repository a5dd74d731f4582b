//! Split-bill API endpoint

use api_types::split::{SplitCreated, SplitNew};
use axum::{extract::State, http::StatusCode, Json};

use crate::transactions::day_start;
use crate::{server::ServerState, ServerError};

pub async fn split_new(
    State(state): State<ServerState>,
    Json(payload): Json<SplitNew>,
) -> Result<(StatusCode, Json<SplitCreated>), ServerError> {
    let outcome = state
        .ledger
        .split_bill(engine::SplitDraft {
            payer: payload.payer,
            participants: payload.participants,
            total: engine::MoneyPaise::new(payload.total_paise),
            description: payload.description.unwrap_or_default(),
            date: day_start(payload.date),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SplitCreated {
            expense_id: outcome.expense_id,
            transfer_ids: outcome.transfer_ids,
            share_paise: outcome.share.paise(),
        }),
    ))
}
