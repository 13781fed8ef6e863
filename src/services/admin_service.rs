//! Account administration: listing, role grants, activation.
//!
//! Every role or status mutation funnels through one policy check so the
//! owner protections and the last-admin guard live in a single place.

use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::AccountEntity,
    dto::{
        admin::{AccountPage, UpdateRoleRequest, UpdateStatusRequest},
        auth::AccountResponse,
        common::{PageQuery, paginate},
    },
    error::ServiceError,
    state::SharedState,
};

/// Paginated account listing for administrators.
pub async fn list_accounts(
    state: &SharedState,
    query: PageQuery,
) -> Result<AccountPage, ServiceError> {
    let store = state.require_pick_store().await?;
    let accounts: Vec<AccountResponse> = store
        .list_accounts()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let page = query.page.unwrap_or(1);
    let page_size = state.config().clamp_page_size(query.page_size);
    let (accounts, info) = paginate(accounts, page, page_size);

    Ok(AccountPage {
        accounts,
        page: info,
    })
}

/// Grant or revoke the admin role flag on a target account.
pub async fn update_role(
    state: &SharedState,
    actor: &AccountEntity,
    target_id: Uuid,
    request: UpdateRoleRequest,
) -> Result<AccountResponse, ServiceError> {
    let store = state.require_pick_store().await?;
    let accounts = store.list_accounts().await?;
    let mut target = find_target(&accounts, target_id)?;

    ensure_mutation_allowed(actor, &target)?;
    if target.is_admin && !request.is_admin {
        ensure_not_last_admin(&accounts, &target)?;
    }

    target.is_admin = request.is_admin;
    target.updated_at = SystemTime::now();
    store.save_account(target.clone()).await?;
    info!(
        actor = %actor.handle,
        target = %target.handle,
        is_admin = request.is_admin,
        "account role updated"
    );
    Ok(target.into())
}

/// Activate or deactivate a target account.
pub async fn update_status(
    state: &SharedState,
    actor: &AccountEntity,
    target_id: Uuid,
    request: UpdateStatusRequest,
) -> Result<AccountResponse, ServiceError> {
    let store = state.require_pick_store().await?;
    let accounts = store.list_accounts().await?;
    let mut target = find_target(&accounts, target_id)?;

    ensure_mutation_allowed(actor, &target)?;
    if target.is_admin && target.is_active && !request.is_active {
        ensure_not_last_admin(&accounts, &target)?;
    }

    target.is_active = request.is_active;
    target.updated_at = SystemTime::now();
    store.save_account(target.clone()).await?;
    info!(
        actor = %actor.handle,
        target = %target.handle,
        is_active = request.is_active,
        "account status updated"
    );
    Ok(target.into())
}

fn find_target(
    accounts: &[AccountEntity],
    target_id: Uuid,
) -> Result<AccountEntity, ServiceError> {
    accounts
        .iter()
        .find(|account| account.id == target_id)
        .cloned()
        .ok_or_else(|| ServiceError::NotFound(format!("account `{target_id}` not found")))
}

/// Owner accounts can only be touched by owners.
fn ensure_mutation_allowed(
    actor: &AccountEntity,
    target: &AccountEntity,
) -> Result<(), ServiceError> {
    if target.is_owner && !actor.is_owner {
        return Err(ServiceError::Forbidden(
            "owner accounts can only be modified by an owner".into(),
        ));
    }
    Ok(())
}

/// Demoting or deactivating the last active admin would lock everyone out.
fn ensure_not_last_admin(
    accounts: &[AccountEntity],
    target: &AccountEntity,
) -> Result<(), ServiceError> {
    let other_admins = accounts
        .iter()
        .filter(|account| account.is_admin && account.is_active && account.id != target.id)
        .count();
    if other_admins == 0 {
        return Err(ServiceError::InvalidState(
            "cannot remove the last active administrator".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::pick_service::tests::seeded_account, state::test_state};

    async fn seeded_admin(
        state: &SharedState,
        handle: &str,
        is_owner: bool,
    ) -> AccountEntity {
        let mut account = seeded_account(state, handle).await;
        account.is_admin = true;
        account.is_owner = is_owner;
        let store = state.require_pick_store().await.unwrap();
        store.save_account(account.clone()).await.unwrap();
        account
    }

    #[tokio::test]
    async fn admins_can_promote_and_demote() {
        let state = test_state().await;
        let boss = seeded_admin(&state, "boss_lady", false).await;
        let newcomer = seeded_account(&state, "newcomer").await;

        let promoted = update_role(
            &state,
            &boss,
            newcomer.id,
            UpdateRoleRequest { is_admin: true },
        )
        .await
        .unwrap();
        assert!(promoted.is_admin);

        let demoted = update_role(
            &state,
            &boss,
            newcomer.id,
            UpdateRoleRequest { is_admin: false },
        )
        .await
        .unwrap();
        assert!(!demoted.is_admin);
    }

    #[tokio::test]
    async fn the_last_admin_cannot_be_demoted() {
        let state = test_state().await;
        let boss = seeded_admin(&state, "boss_lady", false).await;

        let err = update_role(
            &state,
            &boss,
            boss.id,
            UpdateRoleRequest { is_admin: false },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn the_last_admin_cannot_be_deactivated() {
        let state = test_state().await;
        let boss = seeded_admin(&state, "boss_lady", false).await;

        let err = update_status(
            &state,
            &boss,
            boss.id,
            UpdateStatusRequest { is_active: false },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn owners_are_shielded_from_plain_admins() {
        let state = test_state().await;
        let owner = seeded_admin(&state, "founder", true).await;
        let boss = seeded_admin(&state, "boss_lady", false).await;

        let err = update_role(
            &state,
            &boss,
            owner.id,
            UpdateRoleRequest { is_admin: false },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        // An owner may demote another admin.
        let demoted = update_role(
            &state,
            &owner,
            boss.id,
            UpdateRoleRequest { is_admin: false },
        )
        .await
        .unwrap();
        assert!(!demoted.is_admin);
    }

    #[tokio::test]
    async fn deactivating_a_regular_account_is_allowed() {
        let state = test_state().await;
        let boss = seeded_admin(&state, "boss_lady", false).await;
        let member = seeded_account(&state, "member_one").await;

        let updated = update_status(
            &state,
            &boss,
            member.id,
            UpdateStatusRequest { is_active: false },
        )
        .await
        .unwrap();
        assert!(!updated.is_active);
    }
}
