//! In-memory repository for development runs and tests.
//!
//! State does not survive restarts. Locks are never held across `.await`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::repository::{
    NewVerification, RepositoryError, SocialAccount, VerificationRecord, VerificationRepository,
};

#[derive(Debug, Default)]
struct Store {
    social_accounts: HashMap<Uuid, SocialAccount>,
    trust_levels: HashMap<Uuid, String>,
    verifications: Vec<(NewVerification, VerificationRecord)>,
}

/// Repository backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_social_account(&self, account: SocialAccount) {
        self.store.write().social_accounts.insert(account.id, account);
    }

    pub fn set_trust_level(&self, user_id: Uuid, level: impl Into<String>) {
        self.store.write().trust_levels.insert(user_id, level.into());
    }

    /// Every inserted row, oldest first.
    pub fn verifications(&self) -> Vec<NewVerification> {
        self.store
            .read()
            .verifications
            .iter()
            .map(|(new, _)| new.clone())
            .collect()
    }
}

#[async_trait]
impl VerificationRepository for InMemoryRepository {
    async fn find_social_account(&self, id: Uuid) -> Result<Option<SocialAccount>, RepositoryError> {
        Ok(self.store.read().social_accounts.get(&id).cloned())
    }

    async fn insert_verification(&self, record: &NewVerification) -> Result<Uuid, RepositoryError> {
        let id = Uuid::new_v4();
        let stored = VerificationRecord::from_new(id, record);
        self.store.write().verifications.push((record.clone(), stored));
        Ok(id)
    }

    async fn trust_level(&self, user_id: Uuid) -> Result<Option<String>, RepositoryError> {
        Ok(self.store.read().trust_levels.get(&user_id).cloned())
    }

    async fn latest_verification(
        &self,
        social_account_id: Uuid,
    ) -> Result<Option<VerificationRecord>, RepositoryError> {
        Ok(self
            .store
            .read()
            .verifications
            .iter()
            .map(|(_, record)| record)
            .filter(|r| r.social_account_id == social_account_id)
            .max_by_key(|r| r.verified_at)
            .cloned())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
