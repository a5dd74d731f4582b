//! Reports API endpoints

use api_types::reports::{
    BalanceDriftView, CategoryTotalView, MonthlyPointView, MonthlyQuery, RangeQuery,
    ReconcileResponse, UserTotalsView,
};
use axum::{
    extract::{Query, State},
    Json,
};
use engine::reports::DateRange;

use crate::{server::ServerState, ServerError};

pub(crate) fn range_of(query: &RangeQuery) -> Result<DateRange, ServerError> {
    if query.from > query.to {
        return Err(ServerError::Generic(
            "from must not be after to".to_string(),
        ));
    }
    Ok(DateRange {
        from: query.from,
        to: query.to,
    })
}

pub async fn categories(
    State(state): State<ServerState>,
    Query(payload): Query<RangeQuery>,
) -> Result<Json<Vec<CategoryTotalView>>, ServerError> {
    let range = range_of(&payload)?;
    let totals = state
        .ledger
        .report_expense_by_category(&range)
        .await?
        .into_iter()
        .map(|entry| CategoryTotalView {
            category: entry.category,
            total_paise: entry.total.paise(),
        })
        .collect();
    Ok(Json(totals))
}

pub async fn by_user(
    State(state): State<ServerState>,
    Query(payload): Query<RangeQuery>,
) -> Result<Json<Vec<UserTotalsView>>, ServerError> {
    let range = range_of(&payload)?;
    let totals = state
        .ledger
        .report_totals_by_user(&range)
        .await?
        .into_iter()
        .map(|entry| UserTotalsView {
            user_id: entry.user_id,
            name: entry.name,
            expense_paise: entry.expense.paise(),
            income_paise: entry.income.paise(),
        })
        .collect();
    Ok(Json(totals))
}

pub async fn monthly(
    State(state): State<ServerState>,
    Query(payload): Query<MonthlyQuery>,
) -> Result<Json<Vec<MonthlyPointView>>, ServerError> {
    let months = payload.months.unwrap_or(6);
    if months == 0 || months > 120 {
        return Err(ServerError::Generic(
            "months must be between 1 and 120".to_string(),
        ));
    }
    let points = state
        .ledger
        .report_monthly_trend(months)
        .await?
        .into_iter()
        .map(|point| MonthlyPointView {
            year: point.year,
            month: point.month,
            income_paise: point.income.paise(),
            expense_paise: point.expense.paise(),
            net_paise: point.net.paise(),
        })
        .collect();
    Ok(Json(points))
}

pub async fn reconcile(
    State(state): State<ServerState>,
) -> Result<Json<ReconcileResponse>, ServerError> {
    let corrected = state
        .ledger
        .recompute_balances()
        .await?
        .into_iter()
        .map(|drift| BalanceDriftView {
            user_id: drift.user_id,
            stored_paise: drift.stored.paise(),
            computed_paise: drift.computed.paise(),
        })
        .collect();
    Ok(Json(ReconcileResponse { corrected }))
}
