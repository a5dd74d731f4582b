//! Family member documents.
//!
//! The `balance` field is the denormalized running total the mutation
//! protocol maintains; it is eventually consistent with the transaction set
//! and corrected by [`recompute_balances`].
//!
//! [`recompute_balances`]: crate::Ledger::recompute_balances

use serde::{Deserialize, Serialize};

use crate::store::{from_document, to_document, Document};
use crate::{MoneyPaise, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Document key; short family nickname in practice.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub balance: MoneyPaise,
    pub role: Role,
    /// Set once the member links the profile to a sign-in identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, balance: MoneyPaise, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance,
            role,
            email: None,
        }
    }

    pub fn to_doc(&self) -> ResultLedger<Document> {
        to_document(self)
    }

    pub fn from_doc(id: &str, doc: Document) -> ResultLedger<Self> {
        let mut user: User = from_document(doc)?;
        user.id = id.to_string();
        Ok(user)
    }
}
