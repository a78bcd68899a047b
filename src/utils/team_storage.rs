// src/utils/team_storage.rs
use crate::models::{ServiceError, Team, TeamMember, TeamWithMembers, User};
use crate::utils::record_store::Store;
use crate::utils::user_storage;
use log::info;

pub fn save_team(store: &Store, team: &Team) -> Result<(), ServiceError> {
    store.save(team)
}

pub fn find_team_by_id(store: &Store, team_id: &str) -> Result<Option<Team>, ServiceError> {
    store.find(team_id)
}

pub fn find_team_by_name(store: &Store, name: &str) -> Result<Option<Team>, ServiceError> {
    store.find_where(|team: &Team| team.name == name)
}

// All teams with their members, oldest team first
pub fn list_teams_with_members(store: &Store) -> Result<Vec<TeamWithMembers>, ServiceError> {
    let mut teams: Vec<Team> = store.list()?;
    teams.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let users = user_storage::list_users(store)?;

    Ok(teams
        .into_iter()
        .map(|team| {
            let members = members_of(&users, &team.id);
            TeamWithMembers {
                team,
                users: members,
            }
        })
        .collect())
}

fn members_of(users: &[User], team_id: &str) -> Vec<TeamMember> {
    users
        .iter()
        .filter(|user| user.team_id.as_deref() == Some(team_id))
        .map(|user| TeamMember {
            id: user.id.clone(),
            username: user.username.clone(),
            avatar_url: user.avatar_url.clone(),
        })
        .collect()
}

// Delete a team after detaching its members
pub fn delete_team(store: &Store, team_id: &str) -> Result<bool, ServiceError> {
    let _guard = store.exclusive()?;

    if store.find::<Team>(team_id)?.is_none() {
        return Ok(false);
    }

    let detached = user_storage::detach_team(store, team_id)?;
    info!("👥 Detached {} member(s) from team: {}", detached, team_id);

    store.delete::<Team>(team_id)
}
