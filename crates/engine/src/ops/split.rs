//! Split-bill fan-out.
//!
//! One shared cost becomes one payer expense plus one transfer per
//! participant back to the payer, each created through the normal lifecycle
//! path so balances move under the same polarity table.

use chrono::{DateTime, Utc};

use crate::transactions::{TransactionDraft, TransactionKind};
use crate::{LedgerError, MoneyPaise, ResultLedger};

use super::Ledger;

/// A shared cost to fan out across the family.
#[derive(Clone, Debug)]
pub struct SplitDraft {
    pub payer: String,
    /// User ids sharing the cost, excluding the payer.
    pub participants: Vec<String>,
    pub total: MoneyPaise,
    pub description: String,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct SplitOutcome {
    pub expense_id: String,
    pub transfer_ids: Vec<String>,
    /// Equal share charged to each head, payer included.
    pub share: MoneyPaise,
}

impl Ledger {
    /// Records a shared expense and the settlement transfers.
    ///
    /// The payer is debited the full total by the expense, then credited one
    /// share per participant as the transfers land; the payer's net change
    /// is their own share. Rounding remainders are not redistributed. Each
    /// record/balance write commits on its own, so a failure mid-loop
    /// leaves the participants already processed charged; there is no
    /// rollback.
    pub async fn split_bill(&self, draft: SplitDraft) -> ResultLedger<SplitOutcome> {
        let payer = draft.payer.trim().to_string();
        if payer.is_empty() {
            return Err(LedgerError::Validation("payer is required".to_string()));
        }
        let mut participants: Vec<String> = Vec::new();
        for participant in &draft.participants {
            let participant = participant.trim();
            if participant.is_empty() || participants.iter().any(|p| p == participant) {
                continue;
            }
            participants.push(participant.to_string());
        }
        if participants.is_empty() {
            return Err(LedgerError::Validation(
                "at least one participant besides the payer is required".to_string(),
            ));
        }
        if participants.iter().any(|p| *p == payer) {
            return Err(LedgerError::Validation(
                "payer cannot be a participant".to_string(),
            ));
        }
        if !draft.total.is_positive() {
            return Err(LedgerError::Validation("amount must be > 0".to_string()));
        }

        let share = equal_share(draft.total, 1 + participants.len());
        if !share.is_positive() {
            return Err(LedgerError::Validation(
                "total is too small to split".to_string(),
            ));
        }

        let description = if draft.description.trim().is_empty() {
            "general transaction".to_string()
        } else {
            draft.description
        };

        let expense_id = self
            .create_transaction(TransactionDraft {
                kind: TransactionKind::Expense,
                amount: draft.total,
                date: draft.date,
                user: payer.clone(),
                to: None,
                description: description.clone(),
                category: "Shared Expense".to_string(),
            })
            .await?;

        let mut transfer_ids = Vec::with_capacity(participants.len());
        for participant in &participants {
            let transfer_id = self
                .create_transaction(TransactionDraft {
                    kind: TransactionKind::Transfer,
                    amount: share,
                    date: draft.date,
                    user: participant.clone(),
                    to: Some(payer.clone()),
                    description: format!("Split: {description}"),
                    category: "Split Settlement".to_string(),
                })
                .await?;
            transfer_ids.push(transfer_id);
        }

        tracing::info!(
            payer = %payer,
            participants = participants.len(),
            share = %share,
            "split recorded"
        );
        Ok(SplitOutcome {
            expense_id,
            transfer_ids,
            share,
        })
    }
}

/// Equal share of `total` among `count` heads, rounded **half-up to whole
/// rupees**, the documented rounding rule for splits. The remainder stays
/// with the payer as accepted drift.
fn equal_share(total: MoneyPaise, count: usize) -> MoneyPaise {
    let denominator = count as i64 * 100;
    let rupees = (2 * total.paise() + denominator) / (2 * denominator);
    MoneyPaise::from_rupees(rupees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_rounds_half_up_to_whole_rupees() {
        // 100 / 3 = 33.33… -> 33
        assert_eq!(
            equal_share(MoneyPaise::from_rupees(100), 3),
            MoneyPaise::from_rupees(33)
        );
        // 150 / 4 = 37.5 -> 38
        assert_eq!(
            equal_share(MoneyPaise::from_rupees(150), 4),
            MoneyPaise::from_rupees(38)
        );
        // 300 / 3 divides evenly
        assert_eq!(
            equal_share(MoneyPaise::from_rupees(300), 3),
            MoneyPaise::from_rupees(100)
        );
        // ₹1 across three heads rounds to nothing
        assert_eq!(equal_share(MoneyPaise::from_rupees(1), 3), MoneyPaise::ZERO);
    }
}
