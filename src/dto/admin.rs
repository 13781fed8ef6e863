//! Account administration and maintenance DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{auth::AccountResponse, common::PageInfo};

/// A page of the admin account listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountPage {
    /// Accounts on this page, ordered by creation time.
    pub accounts: Vec<AccountResponse>,
    /// Pagination cursor.
    pub page: PageInfo,
}

/// Grant or revoke the admin role flag.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    /// Desired admin flag.
    pub is_admin: bool,
}

/// Activate or deactivate an account.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Desired active flag.
    pub is_active: bool,
}

/// Summary of a hard-delete pass over a soft-deleted event.
#[derive(Debug, Serialize, ToSchema)]
pub struct PurgeResponse {
    /// The event that was purged.
    pub event_id: Uuid,
    /// Whether the event document existed.
    pub event_deleted: bool,
    /// How many orphan pick-sets were removed with it.
    pub pick_sets_removed: u64,
}

/// Summary of the offline aggregate rebuild.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecomputeStatsResponse {
    /// How many account rollups were rebuilt from scratch.
    pub accounts_recomputed: u32,
}
