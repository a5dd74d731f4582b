use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Expense,
    Income,
    Investment,
    Transfer,
    Profit,
    #[serde(rename = "Return of Principal")]
    ReturnOfPrincipal,
}

pub mod user {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        Admin,
        Member,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub name: String,
        pub balance_paise: i64,
        pub role: Role,
        pub email: Option<String>,
    }

    /// Request body for linking a profile to a sign-in identity.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClaimProfile {
        pub email: String,
    }
}

pub mod transaction {
    use super::*;

    /// Request body for create and for full-replace edits.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount_paise: i64,
        /// Date-only input precision.
        pub date: NaiveDate,
        pub user: String,
        pub to: Option<String>,
        pub description: Option<String>,
        pub category: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: String,
    }

    /// Query string for the transactions feed.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        /// Origin user id.
        pub user: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionKind>,
        pub limit: Option<usize>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount_paise: i64,
        pub date: DateTime<Utc>,
        pub user: String,
        pub to: Option<String>,
        /// Blank stored descriptions render as "General Transaction".
        pub description: String,
        pub category: String,
        pub comments: Vec<CommentView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CommentNew {
        pub author_id: String,
        pub text: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CommentView {
        pub id: String,
        pub text: String,
        pub author_id: String,
        pub author_name: String,
        pub at: DateTime<Utc>,
    }
}

pub mod split {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitNew {
        pub payer: String,
        /// User ids sharing the cost, excluding the payer.
        pub participants: Vec<String>,
        pub total_paise: i64,
        pub description: Option<String>,
        pub date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitCreated {
        pub expense_id: String,
        pub transfer_ids: Vec<String>,
        pub share_paise: i64,
    }
}

pub mod reports {
    use super::*;

    /// Inclusive calendar-day range, shared by the report and export
    /// endpoints.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RangeQuery {
        pub from: NaiveDate,
        pub to: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyQuery {
        /// Trailing months to include; defaults to 6.
        pub months: Option<usize>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalView {
        pub category: String,
        pub total_paise: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserTotalsView {
        pub user_id: String,
        pub name: String,
        pub expense_paise: i64,
        pub income_paise: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyPointView {
        pub year: i32,
        pub month: u32,
        pub income_paise: i64,
        pub expense_paise: i64,
        pub net_paise: i64,
    }

    /// One corrected balance from a reconciliation run.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceDriftView {
        pub user_id: String,
        pub stored_paise: i64,
        pub computed_paise: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReconcileResponse {
        pub corrected: Vec<BalanceDriftView>,
    }
}
