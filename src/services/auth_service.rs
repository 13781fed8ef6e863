//! Registration, login, and profile management.

use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth,
    dao::models::{AccountEntity, AccountStatsEntity},
    dto::auth::{LoginRequest, RegisterRequest, TokenResponse, UpdateProfileRequest},
    error::ServiceError,
    state::SharedState,
};

/// Create an account, its empty stats rollup, and a first bearer token.
pub async fn register(
    state: &SharedState,
    request: RegisterRequest,
) -> Result<TokenResponse, ServiceError> {
    request.validate()?;
    let store = state.require_pick_store().await?;
    let now = SystemTime::now();

    let email = request.email.to_lowercase();
    if store
        .find_account_by_handle(request.handle.clone())
        .await?
        .is_some()
    {
        return Err(ServiceError::InvalidState(format!(
            "handle `{}` is already taken",
            request.handle
        )));
    }
    if store.find_account_by_email(email.clone()).await?.is_some() {
        return Err(ServiceError::InvalidState(
            "an account with this email already exists".into(),
        ));
    }

    let password_hash = auth::hash_password(&request.password)
        .map_err(|err| ServiceError::Internal(err.to_string()))?;

    let account = AccountEntity {
        id: Uuid::new_v4(),
        handle: request.handle,
        email,
        password_hash,
        is_admin: false,
        is_owner: false,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    // The stats rollup is born with the account and lives as long as it does.
    store.save_account(account.clone()).await?;
    store
        .save_stats(AccountStatsEntity::empty(account.id, now))
        .await?;

    info!(account_id = %account.id, handle = %account.handle, "account registered");
    issue_token(state, account)
}

/// Exchange credentials for a bearer token.
pub async fn login(
    state: &SharedState,
    request: LoginRequest,
) -> Result<TokenResponse, ServiceError> {
    request.validate()?;
    let store = state.require_pick_store().await?;

    let identifier = request.identifier.to_lowercase();
    let account = match store.find_account_by_handle(identifier.clone()).await? {
        Some(account) => Some(account),
        None => store.find_account_by_email(identifier).await?,
    };

    // Same terse message for unknown accounts and wrong passwords.
    let invalid = || ServiceError::Unauthorized("invalid credentials".into());
    let account = account.ok_or_else(invalid)?;

    let matches = auth::verify_password(&request.password, &account.password_hash)
        .map_err(|err| ServiceError::Internal(err.to_string()))?;
    if !matches {
        return Err(invalid());
    }

    if !account.is_active {
        return Err(ServiceError::Forbidden("account is deactivated".into()));
    }

    issue_token(state, account)
}

/// Update the caller's email or password.
pub async fn update_profile(
    state: &SharedState,
    account: AccountEntity,
    request: UpdateProfileRequest,
) -> Result<AccountEntity, ServiceError> {
    request.validate()?;
    let store = state.require_pick_store().await?;
    let mut account = account;

    if let Some(email) = request.email {
        let email = email.to_lowercase();
        let taken = store
            .find_account_by_email(email.clone())
            .await?
            .is_some_and(|other| other.id != account.id);
        if taken {
            return Err(ServiceError::InvalidState(
                "an account with this email already exists".into(),
            ));
        }
        account.email = email;
    }

    if let Some(new_password) = request.new_password {
        let current = request.current_password.ok_or_else(|| {
            ServiceError::InvalidInput("current_password is required to change the password".into())
        })?;
        let matches = auth::verify_password(&current, &account.password_hash)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        if !matches {
            return Err(ServiceError::Unauthorized(
                "current password does not match".into(),
            ));
        }
        account.password_hash = auth::hash_password(&new_password)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
    }

    account.updated_at = SystemTime::now();
    store.save_account(account.clone()).await?;
    Ok(account)
}

fn issue_token(state: &SharedState, account: AccountEntity) -> Result<TokenResponse, ServiceError> {
    let token = state
        .token_keys()
        .issue(&account, state.config().token_ttl())
        .map_err(|err| ServiceError::Internal(err.to_string()))?;

    Ok(TokenResponse {
        token,
        account: account.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    fn register_request(handle: &str) -> RegisterRequest {
        RegisterRequest {
            handle: handle.into(),
            email: format!("{handle}@example.com"),
            password: "correct-horse-battery".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let state = test_state().await;
        let registered = register(&state, register_request("iron_mike")).await.unwrap();
        assert!(!registered.token.is_empty());
        assert!(!registered.account.is_admin);

        let logged_in = login(
            &state,
            LoginRequest {
                identifier: "iron_mike".into(),
                password: "correct-horse-battery".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(logged_in.account.id, registered.account.id);

        // Email works as the identifier too.
        login(
            &state,
            LoginRequest {
                identifier: "iron_mike@example.com".into(),
                password: "correct-horse-battery".into(),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn registration_creates_the_stats_rollup() {
        let state = test_state().await;
        let registered = register(&state, register_request("iron_mike")).await.unwrap();

        let store = state.require_pick_store().await.unwrap();
        let stats = store
            .find_stats(registered.account.id)
            .await
            .unwrap()
            .expect("stats created at registration");
        assert_eq!(stats.total_picks, 0);
    }

    #[tokio::test]
    async fn duplicate_handles_are_rejected() {
        let state = test_state().await;
        register(&state, register_request("iron_mike")).await.unwrap();

        let err = register(&state, register_request("iron_mike"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_account_look_identical() {
        let state = test_state().await;
        register(&state, register_request("iron_mike")).await.unwrap();

        let wrong_password = login(
            &state,
            LoginRequest {
                identifier: "iron_mike".into(),
                password: "not-the-password".into(),
            },
        )
        .await
        .unwrap_err();
        let unknown = login(
            &state,
            LoginRequest {
                identifier: "nobody_here".into(),
                password: "whatever-pass".into(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn password_change_requires_the_current_password() {
        let state = test_state().await;
        let registered = register(&state, register_request("iron_mike")).await.unwrap();
        let store = state.require_pick_store().await.unwrap();
        let account = store
            .find_account(registered.account.id)
            .await
            .unwrap()
            .unwrap();

        let err = update_profile(
            &state,
            account.clone(),
            UpdateProfileRequest {
                email: None,
                new_password: Some("a-brand-new-pass".into()),
                current_password: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        update_profile(
            &state,
            account,
            UpdateProfileRequest {
                email: None,
                new_password: Some("a-brand-new-pass".into()),
                current_password: Some("correct-horse-battery".into()),
            },
        )
        .await
        .unwrap();

        login(
            &state,
            LoginRequest {
                identifier: "iron_mike".into(),
                password: "a-brand-new-pass".into(),
            },
        )
        .await
        .unwrap();
    }
}
