//! In-memory [`PickStore`] used by the test suite and as a no-database fallback.

use dashmap::DashMap;
use futures::future::BoxFuture;
use std::sync::Arc;
use uuid::Uuid;

use crate::dao::{
    models::{AccountEntity, AccountStatsEntity, EventEntity, PickSetEntity},
    pick_store::PickStore,
    storage::{StorageError, StorageResult},
};

/// Process-local store enforcing the same uniqueness constraints as the
/// database-backed implementation.
#[derive(Clone, Default)]
pub struct MemoryPickStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    accounts: DashMap<Uuid, AccountEntity>,
    events: DashMap<Uuid, EventEntity>,
    pick_sets: DashMap<Uuid, PickSetEntity>,
    stats: DashMap<Uuid, AccountStatsEntity>,
}

impl MemoryPickStore {
    /// Fresh empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn save_account_sync(&self, account: AccountEntity) -> StorageResult<()> {
        let duplicate = self.inner.accounts.iter().any(|existing| {
            existing.id != account.id
                && (existing.handle == account.handle || existing.email == account.email)
        });
        if duplicate {
            return Err(StorageError::conflict(format!(
                "account with handle `{}` or email `{}` already exists",
                account.handle, account.email
            )));
        }

        self.inner.accounts.insert(account.id, account);
        Ok(())
    }

    fn save_pick_set_sync(&self, pick_set: PickSetEntity) -> StorageResult<()> {
        let duplicate = self.inner.pick_sets.iter().any(|existing| {
            existing.id != pick_set.id
                && existing.account_id == pick_set.account_id
                && existing.event_id == pick_set.event_id
        });
        if duplicate {
            return Err(StorageError::conflict(format!(
                "pick-set for account `{}` and event `{}` already exists",
                pick_set.account_id, pick_set.event_id
            )));
        }

        self.inner.pick_sets.insert(pick_set.id, pick_set);
        Ok(())
    }
}

impl PickStore for MemoryPickStore {
    fn save_account(&self, account: AccountEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_account_sync(account) })
    }

    fn find_account(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<AccountEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.accounts.get(&id).map(|entry| entry.clone())) })
    }

    fn find_account_by_handle(
        &self,
        handle: String,
    ) -> BoxFuture<'static, StorageResult<Option<AccountEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .accounts
                .iter()
                .find(|entry| entry.handle == handle)
                .map(|entry| entry.clone()))
        })
    }

    fn find_account_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<AccountEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .accounts
                .iter()
                .find(|entry| entry.email == email)
                .map(|entry| entry.clone()))
        })
    }

    fn list_accounts(&self) -> BoxFuture<'static, StorageResult<Vec<AccountEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut accounts: Vec<AccountEntity> = store
                .inner
                .accounts
                .iter()
                .map(|entry| entry.clone())
                .collect();
            accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            Ok(accounts)
        })
    }

    fn save_event(&self, event: EventEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.events.insert(event.id, event);
            Ok(())
        })
    }

    fn find_event(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<EventEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.events.get(&id).map(|entry| entry.clone())) })
    }

    fn list_events(
        &self,
        include_inactive: bool,
    ) -> BoxFuture<'static, StorageResult<Vec<EventEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut events: Vec<EventEntity> = store
                .inner
                .events
                .iter()
                .filter(|entry| include_inactive || entry.is_active)
                .map(|entry| entry.clone())
                .collect();
            events.sort_by(|a, b| a.event_date.cmp(&b.event_date));
            Ok(events)
        })
    }

    fn delete_event(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.events.remove(&id).is_some()) })
    }

    fn save_pick_set(&self, pick_set: PickSetEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_pick_set_sync(pick_set) })
    }

    fn find_pick_set(
        &self,
        account_id: Uuid,
        event_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PickSetEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .pick_sets
                .iter()
                .find(|entry| entry.account_id == account_id && entry.event_id == event_id)
                .map(|entry| entry.clone()))
        })
    }

    fn list_pick_sets_for_event(
        &self,
        event_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .pick_sets
                .iter()
                .filter(|entry| entry.event_id == event_id)
                .map(|entry| entry.clone())
                .collect())
        })
    }

    fn list_pick_sets_for_account(
        &self,
        account_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .pick_sets
                .iter()
                .filter(|entry| entry.account_id == account_id)
                .map(|entry| entry.clone())
                .collect())
        })
    }

    fn delete_pick_sets_for_event(
        &self,
        event_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            let doomed: Vec<Uuid> = store
                .inner
                .pick_sets
                .iter()
                .filter(|entry| entry.event_id == event_id)
                .map(|entry| entry.id)
                .collect();
            let mut removed = 0;
            for id in doomed {
                if store.inner.pick_sets.remove(&id).is_some() {
                    removed += 1;
                }
            }
            Ok(removed)
        })
    }

    fn save_stats(&self, stats: AccountStatsEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.stats.insert(stats.account_id, stats);
            Ok(())
        })
    }

    fn find_stats(
        &self,
        account_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<AccountStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.stats.get(&account_id).map(|entry| entry.clone())) })
    }

    fn list_stats(&self) -> BoxFuture<'static, StorageResult<Vec<AccountStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .stats
                .iter()
                .map(|entry| entry.clone())
                .collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }
}
