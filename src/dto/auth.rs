//! Registration, login, and profile DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::AccountEntity,
    dto::{format_system_time, validation::validate_handle},
};

/// Payload creating a new account.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Unique login handle.
    #[validate(custom(function = validate_handle))]
    pub handle: String,
    /// Unique contact address.
    #[validate(email)]
    pub email: String,
    /// Raw password, hashed before storage.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Payload exchanging credentials for a bearer token.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    /// Handle or email of the account.
    #[validate(length(min = 3, max = 254))]
    pub identifier: String,
    /// Raw password.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Profile mutation; handle changes are not supported.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    /// New contact address.
    #[validate(email)]
    pub email: Option<String>,
    /// New password; requires `current_password`.
    #[validate(length(min = 8, max = 128))]
    pub new_password: Option<String>,
    /// Current password, checked before any password change.
    pub current_password: Option<String>,
}

/// Public projection of an account.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    /// Account identifier.
    pub id: Uuid,
    /// Login handle.
    pub handle: String,
    /// Contact address.
    pub email: String,
    /// Admin role flag.
    pub is_admin: bool,
    /// Owner role flag.
    pub is_owner: bool,
    /// Whether the account can log in.
    pub is_active: bool,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl From<AccountEntity> for AccountResponse {
    fn from(account: AccountEntity) -> Self {
        Self {
            id: account.id,
            handle: account.handle,
            email: account.email,
            is_admin: account.is_admin,
            is_owner: account.is_owner,
            is_active: account.is_active,
            created_at: format_system_time(account.created_at),
        }
    }
}

/// Bearer token plus the account it belongs to.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Signed bearer token.
    pub token: String,
    /// The authenticated account.
    pub account: AccountResponse,
}
