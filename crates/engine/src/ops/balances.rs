//! Balance reconciliation.
//!
//! The record write and its balance updates commit independently, so a
//! failed step, a dangling reference or a lost write can leave a stored
//! balance out of sync with the transaction set. This job recomputes every
//! balance from the ledger and corrects the drift.

use std::collections::HashMap;

use crate::store::Document;
use crate::transactions::{balance_delta, destination_delta, Direction, TransactionKind};
use crate::{MoneyPaise, ResultLedger};

use super::{Ledger, USERS};

/// One corrected balance: what was stored vs. what the transaction set
/// implies.
#[derive(Clone, Debug, PartialEq)]
pub struct BalanceDrift {
    pub user_id: String,
    pub stored: MoneyPaise,
    pub computed: MoneyPaise,
}

impl Ledger {
    /// Recomputes every member's balance from the full transaction set and
    /// writes back corrections, returning one entry per drifted balance.
    ///
    /// Only the four primary kinds contribute: the legacy report-only kinds
    /// never moved a balance when they were written, so they are excluded
    /// here too.
    pub async fn recompute_balances(&self) -> ResultLedger<Vec<BalanceDrift>> {
        let users = self.users().await?;
        let transactions = self.all_transactions().await?;

        let mut computed: HashMap<String, MoneyPaise> = users
            .iter()
            .map(|user| (user.id.clone(), MoneyPaise::ZERO))
            .collect();

        for tx in &transactions {
            if !tx.kind.is_primary() {
                continue;
            }
            if let Some(total) = computed.get_mut(&tx.user) {
                *total += balance_delta(tx.kind, tx.amount, Direction::Apply)?;
            }
            if tx.kind == TransactionKind::Transfer {
                if let Some(total) = tx.to.as_ref().and_then(|to| computed.get_mut(to)) {
                    *total += destination_delta(tx.amount, Direction::Apply);
                }
            }
        }

        let mut drifts = Vec::new();
        for user in users {
            let Some(&target) = computed.get(&user.id) else {
                continue;
            };
            if user.balance == target {
                continue;
            }

            let mut patch = Document::new();
            patch.insert("balance".to_string(), target.paise().into());
            self.store().update(USERS, &user.id, patch).await?;

            tracing::info!(
                user = %user.id,
                stored = %user.balance,
                computed = %target,
                "corrected drifted balance"
            );
            drifts.push(BalanceDrift {
                user_id: user.id,
                stored: user.balance,
                computed: target,
            });
        }

        Ok(drifts)
    }
}
