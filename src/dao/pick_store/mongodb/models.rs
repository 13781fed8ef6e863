use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{
    AccountEntity, AccountStatsEntity, EventEntity, EventStatus, FightEntity, PickDetailEntity,
    PickSetEntity,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoAccountDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    handle: String,
    email: String,
    password_hash: String,
    is_admin: bool,
    is_owner: bool,
    is_active: bool,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<AccountEntity> for MongoAccountDocument {
    fn from(value: AccountEntity) -> Self {
        Self {
            id: value.id,
            handle: value.handle,
            email: value.email,
            password_hash: value.password_hash,
            is_admin: value.is_admin,
            is_owner: value.is_owner,
            is_active: value.is_active,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoAccountDocument> for AccountEntity {
    fn from(value: MongoAccountDocument) -> Self {
        Self {
            id: value.id,
            handle: value.handle,
            email: value.email,
            password_hash: value.password_hash,
            is_admin: value.is_admin,
            is_owner: value.is_owner,
            is_active: value.is_active,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoEventDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    venue: Option<String>,
    event_date: DateTime,
    pick_deadline: DateTime,
    status: EventStatus,
    is_active: bool,
    fights: Vec<FightEntity>,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<EventEntity> for MongoEventDocument {
    fn from(value: EventEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            venue: value.venue,
            event_date: DateTime::from_system_time(value.event_date),
            pick_deadline: DateTime::from_system_time(value.pick_deadline),
            status: value.status,
            is_active: value.is_active,
            fights: value.fights,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoEventDocument> for EventEntity {
    fn from(value: MongoEventDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            venue: value.venue,
            event_date: value.event_date.to_system_time(),
            pick_deadline: value.pick_deadline.to_system_time(),
            status: value.status,
            is_active: value.is_active,
            fights: value.fights,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPickSetDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    account_id: Uuid,
    event_id: Uuid,
    is_submitted: bool,
    submitted_at: Option<DateTime>,
    is_scored: bool,
    scored_at: Option<DateTime>,
    total_points: u32,
    correct_picks: u32,
    total_picks: u32,
    accuracy: f64,
    picks: Vec<PickDetailEntity>,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<PickSetEntity> for MongoPickSetDocument {
    fn from(value: PickSetEntity) -> Self {
        Self {
            id: value.id,
            account_id: value.account_id,
            event_id: value.event_id,
            is_submitted: value.is_submitted,
            submitted_at: value.submitted_at.map(DateTime::from_system_time),
            is_scored: value.is_scored,
            scored_at: value.scored_at.map(DateTime::from_system_time),
            total_points: value.total_points,
            correct_picks: value.correct_picks,
            total_picks: value.total_picks,
            accuracy: value.accuracy,
            picks: value.picks,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoPickSetDocument> for PickSetEntity {
    fn from(value: MongoPickSetDocument) -> Self {
        Self {
            id: value.id,
            account_id: value.account_id,
            event_id: value.event_id,
            is_submitted: value.is_submitted,
            submitted_at: value.submitted_at.map(|stamp| stamp.to_system_time()),
            is_scored: value.is_scored,
            scored_at: value.scored_at.map(|stamp| stamp.to_system_time()),
            total_points: value.total_points,
            correct_picks: value.correct_picks,
            total_picks: value.total_picks,
            accuracy: value.accuracy,
            picks: value.picks,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoStatsDocument {
    #[serde(rename = "_id")]
    account_id: Uuid,
    total_picks: u32,
    correct_picks: u32,
    total_points: u32,
    events_participated: u32,
    best_event_score: u32,
    current_streak: u32,
    longest_streak: u32,
    avg_accuracy: f64,
    updated_at: DateTime,
}

impl From<AccountStatsEntity> for MongoStatsDocument {
    fn from(value: AccountStatsEntity) -> Self {
        Self {
            account_id: value.account_id,
            total_picks: value.total_picks,
            correct_picks: value.correct_picks,
            total_points: value.total_points,
            events_participated: value.events_participated,
            best_event_score: value.best_event_score,
            current_streak: value.current_streak,
            longest_streak: value.longest_streak,
            avg_accuracy: value.avg_accuracy,
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoStatsDocument> for AccountStatsEntity {
    fn from(value: MongoStatsDocument) -> Self {
        Self {
            account_id: value.account_id,
            total_picks: value.total_picks,
            correct_picks: value.correct_picks,
            total_points: value.total_points,
            events_participated: value.events_participated,
            best_event_score: value.best_event_score,
            current_streak: value.current_streak,
            longest_streak: value.longest_streak,
            avg_accuracy: value.avg_accuracy,
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}
