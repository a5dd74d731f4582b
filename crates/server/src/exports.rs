//! CSV export endpoint

use api_types::reports::RangeQuery;
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

use crate::reports::range_of;
use crate::{server::ServerState, ServerError};

pub async fn csv(
    State(state): State<ServerState>,
    Query(payload): Query<RangeQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let range = range_of(&payload)?;
    let body = state.ledger.export_csv(&range).await?;

    let filename = format!("transactions_{}_to_{}.csv", payload.from, payload.to);
    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}
