//! Transaction primitives.
//!
//! A `Transaction` records one balance-affecting event between family
//! members. Its *polarity* (the sign of its effect on the origin user's
//! balance) is derived from the kind in exactly one place,
//! [`balance_delta`], so create/edit/delete/split all share the same table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{from_document, to_document, Document};
use crate::{LedgerError, MoneyPaise, ResultLedger};

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

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "Expense",
            Self::Income => "Income",
            Self::Investment => "Investment",
            Self::Transfer => "Transfer",
            Self::Profit => "Profit",
            Self::ReturnOfPrincipal => "Return of Principal",
        }
    }

    /// The four kinds the mutation protocol may write.
    ///
    /// `Profit` and `Return of Principal` are legacy report-only kinds: the
    /// aggregator recognizes them but no create/edit path produces them.
    pub fn is_primary(self) -> bool {
        matches!(
            self,
            Self::Expense | Self::Income | Self::Investment | Self::Transfer
        )
    }

    /// Kinds counted as income by the aggregator.
    pub fn is_income_like(self) -> bool {
        matches!(self, Self::Income | Self::Profit | Self::ReturnOfPrincipal)
    }

    /// Kinds counted as spending in the monthly trend.
    pub fn is_expense_like(self) -> bool {
        matches!(self, Self::Expense | Self::Investment)
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Expense" => Ok(Self::Expense),
            "Income" => Ok(Self::Income),
            "Investment" => Ok(Self::Investment),
            "Transfer" => Ok(Self::Transfer),
            "Profit" => Ok(Self::Profit),
            "Return of Principal" => Ok(Self::ReturnOfPrincipal),
            other => Err(LedgerError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// Whether a balance effect is being applied or undone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Apply,
    Revert,
}

/// Signed balance effect of a transaction on its **origin** user.
///
/// | kind       | apply     |
/// |------------|-----------|
/// | Income     | `+amount` |
/// | Expense    | `-amount` |
/// | Investment | `-amount` |
/// | Transfer   | `-amount` |
///
/// `Revert` negates the applied effect. The legacy report-only kinds have no
/// balance polarity; asking for one is an [`LedgerError::UnsupportedKind`]
/// (unreachable from validated drafts).
pub fn balance_delta(
    kind: TransactionKind,
    amount: MoneyPaise,
    direction: Direction,
) -> ResultLedger<MoneyPaise> {
    let applied = match kind {
        TransactionKind::Income => amount,
        TransactionKind::Expense | TransactionKind::Investment | TransactionKind::Transfer => {
            -amount
        }
        TransactionKind::Profit | TransactionKind::ReturnOfPrincipal => {
            return Err(LedgerError::UnsupportedKind(kind.as_str().to_string()));
        }
    };

    Ok(match direction {
        Direction::Apply => applied,
        Direction::Revert => -applied,
    })
}

/// Signed balance effect on a transfer's **destination** user: always the
/// credit of the full amount on apply, its negation on revert.
pub fn destination_delta(amount: MoneyPaise, direction: Direction) -> MoneyPaise {
    match direction {
        Direction::Apply => amount,
        Direction::Revert => -amount,
    }
}

/// One entry of a transaction's append-only comment thread.
///
/// Comments never touch balances.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub author_name: String,
    pub at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Store-assigned document key.
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Always positive; the sign is implied by `kind`.
    pub amount: MoneyPaise,
    pub date: DateTime<Utc>,
    /// Origin user id.
    pub user: String,
    /// Destination user id, meaningful only for `Transfer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Stored as given, including the empty string.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

impl Transaction {
    /// Description for list views; blank descriptions render as a
    /// placeholder while the stored value stays untouched.
    pub fn display_description(&self) -> &str {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            "General Transaction"
        } else {
            trimmed
        }
    }

    pub fn to_doc(&self) -> ResultLedger<Document> {
        to_document(self)
    }

    pub fn from_doc(id: &str, doc: Document) -> ResultLedger<Self> {
        let mut tx: Transaction = from_document(doc)?;
        tx.id = id.to_string();
        Ok(tx)
    }
}

/// Fields for a create or a full-replace edit.
#[derive(Clone, Debug)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub amount: MoneyPaise,
    pub date: DateTime<Utc>,
    pub user: String,
    pub to: Option<String>,
    pub description: String,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_matches_polarity_table() {
        let amount = MoneyPaise::from_rupees(50);
        assert_eq!(
            balance_delta(TransactionKind::Income, amount, Direction::Apply).unwrap(),
            amount
        );
        for kind in [
            TransactionKind::Expense,
            TransactionKind::Investment,
            TransactionKind::Transfer,
        ] {
            assert_eq!(
                balance_delta(kind, amount, Direction::Apply).unwrap(),
                -amount
            );
        }
    }

    #[test]
    fn revert_negates_apply() {
        let amount = MoneyPaise::new(12_34);
        for kind in [
            TransactionKind::Expense,
            TransactionKind::Income,
            TransactionKind::Investment,
            TransactionKind::Transfer,
        ] {
            let applied = balance_delta(kind, amount, Direction::Apply).unwrap();
            let reverted = balance_delta(kind, amount, Direction::Revert).unwrap();
            assert_eq!(applied, -reverted);
        }
    }

    #[test]
    fn legacy_kinds_have_no_polarity() {
        for kind in [TransactionKind::Profit, TransactionKind::ReturnOfPrincipal] {
            let err = balance_delta(kind, MoneyPaise::from_rupees(1), Direction::Apply)
                .unwrap_err();
            assert!(matches!(err, LedgerError::UnsupportedKind(_)));
        }
    }

    #[test]
    fn destination_credit_mirrors_on_revert() {
        let amount = MoneyPaise::from_rupees(20);
        assert_eq!(destination_delta(amount, Direction::Apply), amount);
        assert_eq!(destination_delta(amount, Direction::Revert), -amount);
    }

    #[test]
    fn kind_round_trips_through_strings() {
        for kind in [
            TransactionKind::Expense,
            TransactionKind::Income,
            TransactionKind::Investment,
            TransactionKind::Transfer,
            TransactionKind::Profit,
            TransactionKind::ReturnOfPrincipal,
        ] {
            assert_eq!(TransactionKind::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(TransactionKind::try_from("Dividend").is_err());
    }

    #[test]
    fn blank_description_displays_placeholder() {
        let mut tx = Transaction {
            id: "t1".to_string(),
            kind: TransactionKind::Expense,
            amount: MoneyPaise::from_rupees(10),
            date: Utc::now(),
            user: "amma".to_string(),
            to: None,
            description: "  ".to_string(),
            category: "Groceries".to_string(),
            comments: Vec::new(),
        };
        assert_eq!(tx.display_description(), "General Transaction");
        tx.description = " milk ".to_string();
        assert_eq!(tx.display_description(), "milk");
    }
}
