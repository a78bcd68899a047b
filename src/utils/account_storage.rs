// src/utils/account_storage.rs
use crate::models::{AccountResponse, ContentPlan, ServiceError, SocialAccount, User};
use crate::utils::record_store::Store;
use chrono::Utc;
use log::info;
use std::collections::HashMap;

pub fn save_account(store: &Store, account: &SocialAccount) -> Result<(), ServiceError> {
    store.save(account)
}

pub fn find_account_by_id(store: &Store, id: &str) -> Result<Option<SocialAccount>, ServiceError> {
    store.find(id)
}

// Account with its creator joined in
pub fn to_response(store: &Store, account: SocialAccount) -> Result<AccountResponse, ServiceError> {
    let user = match &account.user_id {
        Some(user_id) => store.find::<User>(user_id)?.map(|user| user.to_ref()),
        None => None,
    };
    Ok(AccountResponse { account, user })
}

// Newest accounts first
pub fn list_accounts(store: &Store) -> Result<Vec<AccountResponse>, ServiceError> {
    let users: HashMap<String, User> = store
        .list::<User>()?
        .into_iter()
        .map(|user| (user.id.clone(), user))
        .collect();

    let mut accounts: Vec<SocialAccount> = store.list()?;
    accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(accounts
        .into_iter()
        .map(|account| {
            let user = account
                .user_id
                .as_ref()
                .and_then(|id| users.get(id))
                .map(User::to_ref);
            AccountResponse { account, user }
        })
        .collect())
}

// Delete an account; its plans stay but lose the account reference
pub fn delete_account(store: &Store, account_id: &str) -> Result<bool, ServiceError> {
    let _guard = store.exclusive()?;

    if store.find::<SocialAccount>(account_id)?.is_none() {
        return Ok(false);
    }

    let mut detached = 0;
    for mut plan in store.list::<ContentPlan>()? {
        if plan.social_account_id.as_deref() == Some(account_id) {
            plan.social_account_id = None;
            plan.updated_at = Utc::now();
            store.save(&plan)?;
            detached += 1;
        }
    }
    if detached > 0 {
        info!("📎 Detached {} plan(s) from account: {}", detached, account_id);
    }

    store.delete::<SocialAccount>(account_id)
}
