pub use error::LedgerError;
pub use money::MoneyPaise;
pub use ops::{BalanceDrift, Ledger, LedgerBuilder, SplitDraft, SplitOutcome, TransactionFilter};
pub use store::{
    ChangeEvent, ChangeKind, Document, MemoryStore, Query, Store, StoreError,
};
pub use transactions::{
    balance_delta, destination_delta, Comment, Direction, Transaction, TransactionDraft,
    TransactionKind,
};
pub use users::{Role, User};

mod error;
mod money;
mod ops;
pub mod reports;
mod store;
mod transactions;
mod users;

type ResultLedger<T> = Result<T, LedgerError>;
