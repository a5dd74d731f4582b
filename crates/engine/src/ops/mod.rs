use std::sync::Arc;

use crate::store::Store;
use crate::{LedgerError, ResultLedger};

mod balances;
mod comments;
mod export;
mod reports;
mod split;
mod transactions;
mod users;

pub use balances::BalanceDrift;
pub use split::{SplitDraft, SplitOutcome};
pub use transactions::TransactionFilter;

pub(crate) const USERS: &str = "users";
pub(crate) const TRANSACTIONS: &str = "transactions";

/// Orchestrates the mutation protocol over a [`Store`].
///
/// Each operation is an ordered sequence of independent store calls; there
/// is no cross-document atomicity, so a mid-sequence failure leaves the
/// steps that already committed in place (see `recompute_balances` for the
/// drift correction).
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn Store>,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    pub(crate) fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Change-notification stream over the transaction set, for live
    /// dashboard/report views. The mutation protocol never depends on it.
    pub fn subscribe_transactions(&self) -> tokio::sync::broadcast::Receiver<crate::ChangeEvent> {
        self.store.subscribe(TRANSACTIONS)
    }
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    store: Option<Arc<dyn Store>>,
}

impl LedgerBuilder {
    /// Pass the required backing store.
    pub fn store<S: Store + 'static>(self, store: S) -> LedgerBuilder {
        self.shared_store(Arc::new(store))
    }

    /// Pass an already-shared store handle.
    pub fn shared_store(mut self, store: Arc<dyn Store>) -> LedgerBuilder {
        self.store = Some(store);
        self
    }

    /// Construct `Ledger`
    pub fn build(self) -> ResultLedger<Ledger> {
        let store = self
            .store
            .ok_or_else(|| LedgerError::Validation("a backing store is required".to_string()))?;
        Ok(Ledger { store })
    }
}
