//! Comment threads on transactions.
//!
//! Appending a comment rewrites only the `comments` field of the record;
//! balances are never involved.

use chrono::Utc;
use uuid::Uuid;

use crate::store::{Document, StoreError};
use crate::transactions::Comment;
use crate::users::User;
use crate::{LedgerError, ResultLedger};

use super::{Ledger, TRANSACTIONS, USERS};

impl Ledger {
    /// Appends a comment to a transaction's thread and returns it.
    ///
    /// The author's display name is resolved at append time and stored with
    /// the comment; an unknown author id falls back to the id itself.
    pub async fn add_comment(
        &self,
        transaction_id: &str,
        author_id: &str,
        text: &str,
    ) -> ResultLedger<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LedgerError::Validation(
                "comment text must not be empty".to_string(),
            ));
        }

        let mut tx = self.transaction(transaction_id).await?;

        let author_name = match self.store().get(USERS, author_id).await? {
            Some(doc) => User::from_doc(author_id, doc)?.name,
            None => author_id.to_string(),
        };

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            author_id: author_id.to_string(),
            author_name,
            at: Utc::now(),
        };
        tx.comments.push(comment.clone());

        let mut patch = Document::new();
        patch.insert(
            "comments".to_string(),
            serde_json::to_value(&tx.comments)
                .map_err(|err| StoreError::Malformed(err.to_string()))?,
        );
        self.store().update(TRANSACTIONS, transaction_id, patch).await?;

        Ok(comment)
    }
}
