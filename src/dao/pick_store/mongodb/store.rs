use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult, classify_write_error},
    models::{
        MongoAccountDocument, MongoEventDocument, MongoPickSetDocument, MongoStatsDocument,
        doc_id, uuid_as_binary,
    },
};
use crate::dao::{
    models::{AccountEntity, AccountStatsEntity, EventEntity, PickSetEntity},
    pick_store::PickStore,
    storage::StorageResult,
};

const ACCOUNT_COLLECTION: &str = "accounts";
const EVENT_COLLECTION: &str = "events";
const PICK_SET_COLLECTION: &str = "pick_sets";
const STATS_COLLECTION: &str = "account_stats";

/// MongoDB-backed pick store with reconnect support.
#[derive(Clone)]
pub struct MongoPickStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoPickStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        let unique = |keys: mongodb::bson::Document, name: &str| {
            mongodb::IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .name(Some(name.to_owned()))
                        .unique(Some(true))
                        .build(),
                )
                .build()
        };
        let plain = |keys: mongodb::bson::Document, name: &str| {
            mongodb::IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(Some(name.to_owned())).build())
                .build()
        };

        let accounts = database.collection::<mongodb::bson::Document>(ACCOUNT_COLLECTION);
        accounts
            .create_index(unique(doc! {"handle": 1}, "account_handle_idx"))
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: ACCOUNT_COLLECTION,
                index: "handle",
                source,
            })?;
        accounts
            .create_index(unique(doc! {"email": 1}, "account_email_idx"))
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: ACCOUNT_COLLECTION,
                index: "email",
                source,
            })?;

        let events = database.collection::<mongodb::bson::Document>(EVENT_COLLECTION);
        events
            .create_index(plain(doc! {"event_date": 1}, "event_date_idx"))
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: EVENT_COLLECTION,
                index: "event_date",
                source,
            })?;

        // The compound unique index is the concurrency safety net against
        // duplicate pick-sets created by retried submissions.
        let pick_sets = database.collection::<mongodb::bson::Document>(PICK_SET_COLLECTION);
        pick_sets
            .create_index(unique(
                doc! {"account_id": 1, "event_id": 1},
                "pick_set_account_event_idx",
            ))
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PICK_SET_COLLECTION,
                index: "account_id,event_id",
                source,
            })?;
        pick_sets
            .create_index(plain(doc! {"event_id": 1}, "pick_set_event_idx"))
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PICK_SET_COLLECTION,
                index: "event_id",
                source,
            })?;

        let stats = database.collection::<mongodb::bson::Document>(STATS_COLLECTION);
        stats
            .create_index(plain(
                doc! {"total_points": -1, "correct_picks": -1},
                "stats_ranking_idx",
            ))
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: STATS_COLLECTION,
                index: "total_points,correct_picks",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn accounts(&self) -> Collection<MongoAccountDocument> {
        self.database().await.collection(ACCOUNT_COLLECTION)
    }

    async fn events(&self) -> Collection<MongoEventDocument> {
        self.database().await.collection(EVENT_COLLECTION)
    }

    async fn pick_sets(&self) -> Collection<MongoPickSetDocument> {
        self.database().await.collection(PICK_SET_COLLECTION)
    }

    async fn stats(&self) -> Collection<MongoStatsDocument> {
        self.database().await.collection(STATS_COLLECTION)
    }

    async fn save_account(&self, account: AccountEntity) -> MongoResult<()> {
        let id = account.id;
        let document: MongoAccountDocument = account.into();
        self.accounts()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|err| {
                classify_write_error(err, "account_handle_or_email", |source| {
                    MongoDaoError::SaveDocument {
                        collection: ACCOUNT_COLLECTION,
                        id,
                        source,
                    }
                })
            })?;
        Ok(())
    }

    async fn find_account(&self, id: Uuid) -> MongoResult<Option<AccountEntity>> {
        let document = self
            .accounts()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: ACCOUNT_COLLECTION,
                id,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn find_account_by(
        &self,
        filter: mongodb::bson::Document,
    ) -> MongoResult<Option<AccountEntity>> {
        let document = self
            .accounts()
            .await
            .find_one(filter)
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: ACCOUNT_COLLECTION,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn list_accounts(&self) -> MongoResult<Vec<AccountEntity>> {
        let documents: Vec<MongoAccountDocument> = self
            .accounts()
            .await
            .find(doc! {})
            .sort(doc! {"created_at": 1})
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: ACCOUNT_COLLECTION,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: ACCOUNT_COLLECTION,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn save_event(&self, event: EventEntity) -> MongoResult<()> {
        let id = event.id;
        let document: MongoEventDocument = event.into();
        self.events()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveDocument {
                collection: EVENT_COLLECTION,
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_event(&self, id: Uuid) -> MongoResult<Option<EventEntity>> {
        let document = self
            .events()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: EVENT_COLLECTION,
                id,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn list_events(&self, include_inactive: bool) -> MongoResult<Vec<EventEntity>> {
        let filter = if include_inactive {
            doc! {}
        } else {
            doc! {"is_active": true}
        };

        let documents: Vec<MongoEventDocument> = self
            .events()
            .await
            .find(filter)
            .sort(doc! {"event_date": 1})
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: EVENT_COLLECTION,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: EVENT_COLLECTION,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_event(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .events()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteDocument {
                collection: EVENT_COLLECTION,
                id,
                source,
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn save_pick_set(&self, pick_set: PickSetEntity) -> MongoResult<()> {
        let id = pick_set.id;
        let document: MongoPickSetDocument = pick_set.into();
        self.pick_sets()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|err| {
                classify_write_error(err, "pick_set_account_event", |source| {
                    MongoDaoError::SaveDocument {
                        collection: PICK_SET_COLLECTION,
                        id,
                        source,
                    }
                })
            })?;
        Ok(())
    }

    async fn find_pick_set(
        &self,
        account_id: Uuid,
        event_id: Uuid,
    ) -> MongoResult<Option<PickSetEntity>> {
        let document = self
            .pick_sets()
            .await
            .find_one(doc! {
                "account_id": uuid_as_binary(account_id),
                "event_id": uuid_as_binary(event_id),
            })
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: PICK_SET_COLLECTION,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn list_pick_sets(
        &self,
        filter: mongodb::bson::Document,
    ) -> MongoResult<Vec<PickSetEntity>> {
        let documents: Vec<MongoPickSetDocument> = self
            .pick_sets()
            .await
            .find(filter)
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: PICK_SET_COLLECTION,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: PICK_SET_COLLECTION,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_pick_sets_for_event(&self, event_id: Uuid) -> MongoResult<u64> {
        let result = self
            .pick_sets()
            .await
            .delete_many(doc! {"event_id": uuid_as_binary(event_id)})
            .await
            .map_err(|source| MongoDaoError::DeleteDocument {
                collection: PICK_SET_COLLECTION,
                id: event_id,
                source,
            })?;
        Ok(result.deleted_count)
    }

    async fn save_stats(&self, stats: AccountStatsEntity) -> MongoResult<()> {
        let id = stats.account_id;
        let document: MongoStatsDocument = stats.into();
        self.stats()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveDocument {
                collection: STATS_COLLECTION,
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_stats(&self, account_id: Uuid) -> MongoResult<Option<AccountStatsEntity>> {
        let document = self
            .stats()
            .await
            .find_one(doc_id(account_id))
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: STATS_COLLECTION,
                id: account_id,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn list_stats(&self) -> MongoResult<Vec<AccountStatsEntity>> {
        let documents: Vec<MongoStatsDocument> = self
            .stats()
            .await
            .find(doc! {})
            .sort(doc! {"total_points": -1, "correct_picks": -1})
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: STATS_COLLECTION,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: STATS_COLLECTION,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }
}

impl PickStore for MongoPickStore {
    fn save_account(&self, account: AccountEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_account(account).await.map_err(Into::into) })
    }

    fn find_account(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<AccountEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_account(id).await.map_err(Into::into) })
    }

    fn find_account_by_handle(
        &self,
        handle: String,
    ) -> BoxFuture<'static, StorageResult<Option<AccountEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_account_by(doc! {"handle": handle})
                .await
                .map_err(Into::into)
        })
    }

    fn find_account_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<AccountEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_account_by(doc! {"email": email})
                .await
                .map_err(Into::into)
        })
    }

    fn list_accounts(&self) -> BoxFuture<'static, StorageResult<Vec<AccountEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_accounts().await.map_err(Into::into) })
    }

    fn save_event(&self, event: EventEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_event(event).await.map_err(Into::into) })
    }

    fn find_event(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<EventEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_event(id).await.map_err(Into::into) })
    }

    fn list_events(
        &self,
        include_inactive: bool,
    ) -> BoxFuture<'static, StorageResult<Vec<EventEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_events(include_inactive).await.map_err(Into::into) })
    }

    fn delete_event(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_event(id).await.map_err(Into::into) })
    }

    fn save_pick_set(&self, pick_set: PickSetEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_pick_set(pick_set).await.map_err(Into::into) })
    }

    fn find_pick_set(
        &self,
        account_id: Uuid,
        event_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PickSetEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_pick_set(account_id, event_id)
                .await
                .map_err(Into::into)
        })
    }

    fn list_pick_sets_for_event(
        &self,
        event_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_pick_sets(doc! {"event_id": uuid_as_binary(event_id)})
                .await
                .map_err(Into::into)
        })
    }

    fn list_pick_sets_for_account(
        &self,
        account_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_pick_sets(doc! {"account_id": uuid_as_binary(account_id)})
                .await
                .map_err(Into::into)
        })
    }

    fn delete_pick_sets_for_event(
        &self,
        event_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .delete_pick_sets_for_event(event_id)
                .await
                .map_err(Into::into)
        })
    }

    fn save_stats(&self, stats: AccountStatsEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_stats(stats).await.map_err(Into::into) })
    }

    fn find_stats(
        &self,
        account_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<AccountStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_stats(account_id).await.map_err(Into::into) })
    }

    fn list_stats(&self) -> BoxFuture<'static, StorageResult<Vec<AccountStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_stats().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
