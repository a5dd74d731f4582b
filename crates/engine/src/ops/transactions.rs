//! Transaction lifecycle: create, edit, delete, lookup, listing.
//!
//! Every lifecycle step pairs a record write with one or two balance
//! mutations on the referenced users. The store commits each call on its
//! own, so the sequences here are deliberate about ordering and about what
//! happens when a late step fails: completed steps stay committed.

use crate::store::Query;
use crate::transactions::{
    balance_delta, destination_delta, Direction, Transaction, TransactionDraft, TransactionKind,
};
use crate::{LedgerError, MoneyPaise, ResultLedger};

use super::{normalize_optional_text, Ledger, TRANSACTIONS, USERS};

/// Listing filters for the transactions feed.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    /// Origin user id.
    pub user: Option<String>,
    pub kind: Option<TransactionKind>,
    /// Newest-first cap; the dashboard feed reads the 10 most recent.
    pub limit: Option<usize>,
}

impl Ledger {
    /// Validates and persists a new transaction, then applies its balance
    /// effect to the origin user, and to the destination user for a
    /// transfer.
    ///
    /// The record write and the balance writes commit independently. A
    /// balance failure after the record landed surfaces the error without
    /// removing the record; a missing user is skipped (logged) and the
    /// operation continues.
    pub async fn create_transaction(&self, draft: TransactionDraft) -> ResultLedger<String> {
        let draft = validated(draft)?;

        let tx = Transaction {
            id: String::new(),
            kind: draft.kind,
            amount: draft.amount,
            date: draft.date,
            user: draft.user.clone(),
            to: draft.to.clone(),
            description: draft.description,
            category: draft.category,
            comments: Vec::new(),
        };
        let id = self.store().insert(TRANSACTIONS, tx.to_doc()?).await?;
        tracing::debug!(transaction = %id, kind = draft.kind.as_str(), "transaction recorded");

        self.apply_balance(
            &draft.user,
            balance_delta(draft.kind, draft.amount, Direction::Apply)?,
        )
        .await?;
        if draft.kind == TransactionKind::Transfer {
            if let Some(to) = &draft.to {
                self.apply_balance(to, destination_delta(draft.amount, Direction::Apply))
                    .await?;
            }
        }

        Ok(id)
    }

    /// Replaces a transaction's fields, reconciling balances in two phases:
    /// first fully revert the *stored* transaction's effect, then apply the
    /// new fields' effect, then overwrite the record.
    ///
    /// When the edit changes the origin or destination identity the reverts
    /// target the old users and the applies the new ones, so up to four
    /// balances move. Comments ride along untouched.
    pub async fn update_transaction(
        &self,
        transaction_id: &str,
        draft: TransactionDraft,
    ) -> ResultLedger<()> {
        let old = self.transaction(transaction_id).await?;
        let draft = validated(draft)?;

        self.revert_stored(&old).await?;

        self.apply_balance(
            &draft.user,
            balance_delta(draft.kind, draft.amount, Direction::Apply)?,
        )
        .await?;
        if draft.kind == TransactionKind::Transfer {
            if let Some(to) = &draft.to {
                self.apply_balance(to, destination_delta(draft.amount, Direction::Apply))
                    .await?;
            }
        }

        let tx = Transaction {
            id: old.id,
            kind: draft.kind,
            amount: draft.amount,
            date: draft.date,
            user: draft.user,
            to: draft.to,
            description: draft.description,
            category: draft.category,
            comments: old.comments,
        };
        self.store()
            .set(TRANSACTIONS, transaction_id, tx.to_doc()?)
            .await?;
        Ok(())
    }

    /// Reverts a transaction's balance effect and removes the record.
    ///
    /// Record removal is not contingent on the reverts: a failed balance
    /// write still deletes the record, and the first revert error is
    /// surfaced afterwards.
    pub async fn delete_transaction(&self, transaction_id: &str) -> ResultLedger<()> {
        let tx = self.transaction(transaction_id).await?;

        let revert_result = self.revert_stored(&tx).await;
        if let Err(err) = &revert_result {
            tracing::warn!(
                transaction = transaction_id,
                error = %err,
                "balance revert failed; deleting the record anyway"
            );
        }

        self.store().delete(TRANSACTIONS, transaction_id).await?;
        revert_result
    }

    pub async fn transaction(&self, transaction_id: &str) -> ResultLedger<Transaction> {
        let doc = self
            .store()
            .get(TRANSACTIONS, transaction_id)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("transaction not exists".to_string()))?;
        Transaction::from_doc(transaction_id, doc)
    }

    /// Lists transactions newest first, optionally filtered by origin user
    /// and kind.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> ResultLedger<Vec<Transaction>> {
        let mut query = Query::new().order_by_desc("date");
        if let Some(user) = &filter.user {
            query = query.filter("user", user.as_str());
        }
        if let Some(kind) = filter.kind {
            query = query.filter("type", kind.as_str());
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let rows = self.store().find(TRANSACTIONS, query).await?;
        rows.into_iter()
            .map(|(id, doc)| Transaction::from_doc(&id, doc))
            .collect()
    }

    /// Newest-first history for one member: transactions they originated
    /// plus transfers sent to them, deduplicated by id.
    pub async fn user_transactions(&self, user_id: &str) -> ResultLedger<Vec<Transaction>> {
        let mut rows = self
            .store()
            .find(
                TRANSACTIONS,
                Query::new().filter("user", user_id),
            )
            .await?;
        rows.extend(
            self.store()
                .find(TRANSACTIONS, Query::new().filter("to", user_id))
                .await?,
        );

        let transactions = rows
            .into_iter()
            .map(|(id, doc)| Transaction::from_doc(&id, doc))
            .collect::<ResultLedger<Vec<_>>>()?;
        Ok(crate::reports::user_history(transactions, user_id))
    }

    /// Undoes the balance effect of a stored transaction: origin first,
    /// then the transfer destination when present.
    ///
    /// Legacy report-only kinds never moved a balance when they were
    /// written, so reverting them is a no-op.
    async fn revert_stored(&self, tx: &Transaction) -> ResultLedger<()> {
        if !tx.kind.is_primary() {
            return Ok(());
        }
        self.apply_balance(
            &tx.user,
            balance_delta(tx.kind, tx.amount, Direction::Revert)?,
        )
        .await?;
        if tx.kind == TransactionKind::Transfer {
            if let Some(to) = &tx.to {
                self.apply_balance(to, destination_delta(tx.amount, Direction::Revert))
                    .await?;
            }
        }
        Ok(())
    }

    /// Atomic balance adjustment on one user document.
    ///
    /// A dangling user reference is a logged no-op, not an error: the
    /// surrounding lifecycle step keeps going.
    pub(crate) async fn apply_balance(
        &self,
        user_id: &str,
        delta: MoneyPaise,
    ) -> ResultLedger<()> {
        let found = self
            .store()
            .increment(USERS, user_id, "balance", delta.paise())
            .await?;
        if !found {
            tracing::warn!(user = user_id, "balance update skipped: user not exists");
        }
        Ok(())
    }
}

fn validated(mut draft: TransactionDraft) -> ResultLedger<TransactionDraft> {
    if !draft.kind.is_primary() {
        return Err(LedgerError::Validation(format!(
            "transactions of kind \"{}\" cannot be created",
            draft.kind.as_str()
        )));
    }
    if !draft.amount.is_positive() {
        return Err(LedgerError::Validation("amount must be > 0".to_string()));
    }
    if draft.user.trim().is_empty() {
        return Err(LedgerError::Validation("origin user is required".to_string()));
    }
    draft.user = draft.user.trim().to_string();
    draft.category = draft.category.trim().to_string();

    if draft.kind == TransactionKind::Transfer {
        draft.to = normalize_optional_text(draft.to.as_deref());
        if draft.to.as_deref() == Some(draft.user.as_str()) {
            return Err(LedgerError::Validation(
                "origin and destination must differ".to_string(),
            ));
        }
    } else {
        if draft.category.is_empty() {
            return Err(LedgerError::Validation("category is required".to_string()));
        }
        draft.to = None;
    }

    Ok(draft)
}
