//! Storage abstraction for accounts, events, pick-sets, and aggregate stats.

/// Always-available in-memory backend, used by tests and as a storage fallback.
pub mod memory;
/// MongoDB-backed implementation.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{AccountEntity, AccountStatsEntity, EventEntity, PickSetEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for the pick league.
///
/// Uniqueness constraints (account handle and email, one pick-set per
/// account and event) are enforced by the backend and surface as
/// [`crate::dao::storage::StorageError::Conflict`].
pub trait PickStore: Send + Sync {
    /// Insert or replace an account keyed by its id.
    fn save_account(&self, account: AccountEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up an account by id.
    fn find_account(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<AccountEntity>>>;
    /// Look up an account by its unique handle.
    fn find_account_by_handle(
        &self,
        handle: String,
    ) -> BoxFuture<'static, StorageResult<Option<AccountEntity>>>;
    /// Look up an account by its unique email.
    fn find_account_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<AccountEntity>>>;
    /// All accounts, active or not.
    fn list_accounts(&self) -> BoxFuture<'static, StorageResult<Vec<AccountEntity>>>;

    /// Insert or replace an event keyed by its id.
    fn save_event(&self, event: EventEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up an event by id, soft-deleted ones included.
    fn find_event(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<EventEntity>>>;
    /// All events; `include_inactive` adds soft-deleted cards.
    fn list_events(
        &self,
        include_inactive: bool,
    ) -> BoxFuture<'static, StorageResult<Vec<EventEntity>>>;
    /// Hard-delete an event document. Returns whether anything was removed.
    fn delete_event(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    /// Insert or replace a pick-set keyed by its id.
    fn save_pick_set(&self, pick_set: PickSetEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up the unique pick-set for an (account, event) pair.
    fn find_pick_set(
        &self,
        account_id: Uuid,
        event_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PickSetEntity>>>;
    /// Every pick-set submitted for one event.
    fn list_pick_sets_for_event(
        &self,
        event_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>>;
    /// Every pick-set one account submitted across events.
    fn list_pick_sets_for_account(
        &self,
        account_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>>;
    /// Remove all pick-sets attached to an event. Returns how many were removed.
    fn delete_pick_sets_for_event(
        &self,
        event_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<u64>>;

    /// Insert or replace an account's aggregate rollup.
    fn save_stats(&self, stats: AccountStatsEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up the rollup for one account.
    fn find_stats(
        &self,
        account_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<AccountStatsEntity>>>;
    /// All aggregate rollups.
    fn list_stats(&self) -> BoxFuture<'static, StorageResult<Vec<AccountStatsEntity>>>;

    /// Probe the backend.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the backend connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
