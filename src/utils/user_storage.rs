// src/utils/user_storage.rs
use crate::models::{ContentPlan, ServiceError, SocialAccount, Team, TeamRef, User, UserResponse};
use crate::utils::record_store::Store;
use chrono::Utc;
use log::{error, info};
use std::collections::HashMap;

// Save a user to storage
pub fn save_user(store: &Store, user: &User) -> Result<(), ServiceError> {
    store.save(user)
}

// Find a user by ID
pub fn find_user_by_id(store: &Store, id: &str) -> Result<Option<User>, ServiceError> {
    store.find(id)
}

// Find a user by username
pub fn find_user_by_username(store: &Store, username: &str) -> Result<Option<User>, ServiceError> {
    store.find_where(|user: &User| user.username == username)
}

// Find a user by email
pub fn find_user_by_email(store: &Store, email: &str) -> Result<Option<User>, ServiceError> {
    store.find_where(|user: &User| user.email.eq_ignore_ascii_case(email))
}

// Whether another user already holds this username or email
pub fn username_or_email_taken(
    store: &Store,
    username: &str,
    email: &str,
) -> Result<bool, ServiceError> {
    let existing = store.find_where(|user: &User| {
        user.username == username || user.email.eq_ignore_ascii_case(email)
    })?;
    Ok(existing.is_some())
}

// All users, oldest first
pub fn list_users(store: &Store) -> Result<Vec<User>, ServiceError> {
    let mut users: Vec<User> = store.list()?;
    users.sort_by(|a, b| a.date_joined.cmp(&b.date_joined));
    Ok(users)
}

pub fn team_ref(store: &Store, user: &User) -> Result<Option<TeamRef>, ServiceError> {
    let team_id = match &user.team_id {
        Some(team_id) => team_id,
        None => return Ok(None),
    };

    Ok(store.find::<Team>(team_id)?.map(|team| TeamRef {
        id: team.id,
        name: team.name,
    }))
}

// Public view of a user with its team joined in
pub fn to_response(store: &Store, user: &User) -> Result<UserResponse, ServiceError> {
    Ok(UserResponse::new(user, team_ref(store, user)?))
}

pub fn list_user_responses(store: &Store) -> Result<Vec<UserResponse>, ServiceError> {
    let teams: HashMap<String, TeamRef> = store
        .list::<Team>()?
        .into_iter()
        .map(|team| {
            (
                team.id.clone(),
                TeamRef {
                    id: team.id,
                    name: team.name,
                },
            )
        })
        .collect();

    Ok(list_users(store)?
        .iter()
        .map(|user| {
            let team = user.team_id.as_ref().and_then(|id| teams.get(id)).cloned();
            UserResponse::new(user, team)
        })
        .collect())
}

// Clear the team reference on every member of a team
pub fn detach_team(store: &Store, team_id: &str) -> Result<usize, ServiceError> {
    let mut detached = 0;
    for mut user in store.list::<User>()? {
        if user.team_id.as_deref() == Some(team_id) {
            user.team_id = None;
            user.updated_at = Utc::now();
            store.save(&user)?;
            detached += 1;
        }
    }
    Ok(detached)
}

// Delete a user; accounts and plans they created stay but lose their creator
pub fn delete_user(store: &Store, user_id: &str) -> Result<bool, ServiceError> {
    let _guard = store.exclusive()?;

    if store.find::<User>(user_id)?.is_none() {
        return Ok(false);
    }

    for mut account in store.list::<SocialAccount>()? {
        if account.user_id.as_deref() == Some(user_id) {
            account.user_id = None;
            store.save(&account)?;
        }
    }

    for mut plan in store.list::<ContentPlan>()? {
        if plan.user_id.as_deref() == Some(user_id) {
            plan.user_id = None;
            store.save(&plan)?;
        }
    }

    let deleted = store.delete::<User>(user_id)?;
    if deleted {
        info!("🗑️ Deleted user: {}", user_id);
    } else {
        error!("❌ User vanished during delete: {}", user_id);
    }
    Ok(deleted)
}
