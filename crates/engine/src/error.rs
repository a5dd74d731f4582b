//! The module contains the errors the ledger can throw.
//!
//! [`Validation`] is raised before any store operation, so callers that see
//! it know no partial state was written. [`Store`] wraps a failed store call;
//! steps that completed before the failure are never rolled back.
//!
//! [`Validation`]: LedgerError::Validation
//! [`Store`]: LedgerError::Store
use thiserror::Error;

use crate::store::StoreError;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Unsupported transaction kind: {0}")]
    UnsupportedKind(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::UnsupportedKind(a), Self::UnsupportedKind(b)) => a == b,
            (Self::Store(a), Self::Store(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
