use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::UserCredential;
use crate::domain::account::ports::InsertOutcome;
use crate::domain::account::ports::UserDirectory;

/// Process-local user directory.
///
/// Used when no database is configured and in tests. Records are lost on
/// restart.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    credentials: RwLock<HashMap<EmailAddress, UserCredential>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.credentials.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.credentials.read().await.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredential>, AccountError> {
        Ok(self.credentials.read().await.get(email).cloned())
    }

    async fn insert_if_absent(
        &self,
        credential: UserCredential,
    ) -> Result<InsertOutcome, AccountError> {
        // Check and insert under the same write guard.
        let mut credentials = self.credentials.write().await;

        match credentials.entry(credential.email.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(credential);
                Ok(InsertOutcome::Inserted)
            }
        }
    }
}
