//! Family member operations: listing, seeding, profile claim.

use crate::store::{Document, Query};
use crate::users::User;
use crate::{LedgerError, ResultLedger};

use super::{Ledger, USERS};

impl Ledger {
    pub async fn users(&self) -> ResultLedger<Vec<User>> {
        let rows = self.store().find(USERS, Query::new()).await?;
        rows.into_iter()
            .map(|(id, doc)| User::from_doc(&id, doc))
            .collect()
    }

    pub async fn user(&self, user_id: &str) -> ResultLedger<User> {
        let doc = self
            .store()
            .get(USERS, user_id)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("user not exists".to_string()))?;
        User::from_doc(user_id, doc)
    }

    /// Full write of a member document, keyed by the user's id.
    pub async fn put_user(&self, user: &User) -> ResultLedger<()> {
        if user.id.trim().is_empty() {
            return Err(LedgerError::Validation("user id is required".to_string()));
        }
        self.store().set(USERS, &user.id, user.to_doc()?).await?;
        Ok(())
    }

    /// Writes the initial family members, but only into an empty store.
    /// Returns `false` when members already exist.
    pub async fn seed_users(&self, users: &[User]) -> ResultLedger<bool> {
        if !self.users().await?.is_empty() {
            return Ok(false);
        }
        for user in users {
            self.put_user(user).await?;
        }
        tracing::info!(members = users.len(), "seeded initial family members");
        Ok(true)
    }

    /// Links a profile to a sign-in identity by setting its email, once.
    ///
    /// Claiming an already-claimed profile is a conflict.
    pub async fn claim_profile(&self, user_id: &str, email: &str) -> ResultLedger<User> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(LedgerError::Validation("a valid email is required".to_string()));
        }

        let mut user = self.user(user_id).await?;
        if user.email.as_deref().is_some_and(|existing| !existing.is_empty()) {
            return Err(LedgerError::ExistingKey(format!(
                "profile {user_id} already claimed"
            )));
        }

        let mut patch = Document::new();
        patch.insert("email".to_string(), email.into());
        self.store().update(USERS, user_id, patch).await?;

        user.email = Some(email.to_string());
        Ok(user)
    }
}
