//! At-most-one login per task id.

mod lock;
use lock::KeyedLocks;

use std::sync::Arc;

use mesos_auth_model::{AppPrefix, LoginRecord, TaskId};
use tracing::debug;

use crate::{
    storage::{Storage, StorageEntry, StorageError},
    store::logins_key,
};

/// Result of [`LoginLedger::try_claim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Claimed,
    AlreadyClaimed,
}

/// Per-prefix set of task ids that have already logged in.
///
/// Claims are serialized per prefix within this process, so concurrent logins
/// with the same id cannot both pass the membership check. Ids are never
/// forgotten, even after their task terminates.
pub struct LoginLedger {
    storage: Arc<dyn Storage>,
    locks: KeyedLocks,
}

impl LoginLedger {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            locks: KeyedLocks::default(),
        }
    }

    /// Record `task_id` as logged in under `prefix`, unless it already is.
    pub async fn try_claim(&self, prefix: &AppPrefix, task_id: &TaskId) -> Result<Claim, StorageError> {
        let _guard = self.locks.lock(prefix.as_str()).await;

        let mut record = self.get(prefix).await?.unwrap_or_default();
        if !record.insert(task_id.clone()) {
            debug!(%prefix, %task_id, "task id already claimed");
            return Ok(Claim::AlreadyClaimed);
        }

        let entry = StorageEntry::json(logins_key(prefix.as_str()), &record)?;
        self.storage.put(entry).await?;
        debug!(%prefix, %task_id, claimed = record.len(), "task id claimed");
        Ok(Claim::Claimed)
    }

    pub async fn get(&self, prefix: &AppPrefix) -> Result<Option<LoginRecord>, StorageError> {
        match self.storage.get(&logins_key(prefix.as_str())).await? {
            Some(entry) => Ok(Some(entry.decode_json()?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InmemStorage;

    fn prefix(p: &str) -> AppPrefix {
        AppPrefix::new(p).unwrap()
    }

    #[tokio::test]
    async fn claim_once() {
        let ledger = LoginLedger::new(Arc::new(InmemStorage::new()));
        let id = TaskId::from("app.1");

        assert_eq!(ledger.try_claim(&prefix("app"), &id).await.unwrap(), Claim::Claimed);
        assert_eq!(
            ledger.try_claim(&prefix("app"), &id).await.unwrap(),
            Claim::AlreadyClaimed
        );

        let record = ledger.get(&prefix("app")).await.unwrap().unwrap();
        assert!(record.contains(&id));
        assert_eq!(record.len(), 1);
    }

    #[tokio::test]
    async fn claims_accumulate_per_prefix() {
        let ledger = LoginLedger::new(Arc::new(InmemStorage::new()));
        for id in ["app.1", "app.2"] {
            assert_eq!(
                ledger.try_claim(&prefix("app"), &TaskId::from(id)).await.unwrap(),
                Claim::Claimed
            );
        }
        assert_eq!(
            ledger.try_claim(&prefix("other"), &TaskId::from("app.1")).await.unwrap(),
            Claim::Claimed
        );
        assert_eq!(ledger.get(&prefix("app")).await.unwrap().unwrap().len(), 2);
        assert_eq!(ledger.get(&prefix("other")).await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_claims_admit_exactly_one() {
        let ledger = Arc::new(LoginLedger::new(Arc::new(InmemStorage::new())));
        let mut handles = Vec::new();
        for _ in 0..32 {
            let ledger = Arc::clone(&ledger);
            handles.push(tokio::spawn(async move {
                ledger
                    .try_claim(&prefix("app"), &TaskId::from("app.1"))
                    .await
                    .unwrap()
            }));
        }

        let mut claimed = 0;
        for h in handles {
            if h.await.unwrap() == Claim::Claimed {
                claimed += 1;
            }
        }
        assert_eq!(claimed, 1);
    }
}
