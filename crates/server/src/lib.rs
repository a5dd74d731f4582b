use axum::{http::StatusCode, response::IntoResponse, Json};
use engine::LedgerError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener, ServerState};

mod exports;
mod reports;
mod server;
mod split;
mod transactions;
mod users;

pub mod types {
    pub mod transaction {
        pub use api_types::transaction::{
            CommentNew, CommentView, TransactionCreated, TransactionListQuery,
            TransactionListResponse, TransactionNew, TransactionView,
        };
    }

    pub mod user {
        pub use api_types::user::{ClaimProfile, UserView};
    }

    pub mod split {
        pub use api_types::split::{SplitCreated, SplitNew};
    }

    pub mod reports {
        pub use api_types::reports::{
            BalanceDriftView, CategoryTotalView, MonthlyPointView, MonthlyQuery, RangeQuery,
            ReconcileResponse, UserTotalsView,
        };
    }
}

pub enum ServerError {
    Ledger(LedgerError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::ExistingKey(_) => StatusCode::CONFLICT,
        LedgerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        LedgerError::Validation(_) | LedgerError::UnsupportedKind(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Store(store_err) => {
            tracing::error!("store error: {store_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => {
                (status_for_ledger_error(&err), message_for_ledger_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}
