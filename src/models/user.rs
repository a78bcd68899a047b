// src/models/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AVATAR_URL: &str = "https://i.pravatar.cc/150?u=default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    User,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

// Stored user record, including the password hash
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub avatar_url: String,
    pub phone_number: Option<String>,
    pub active_until: Option<DateTime<Utc>>,
    #[serde(rename = "TeamId")]
    pub team_id: Option<String>,
    pub date_joined: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            role,
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
            phone_number: None,
            active_until: None,
            team_id: None,
            date_joined: now,
            updated_at: now,
        }
    }

    pub fn is_superadmin(&self) -> bool {
        self.role == Role::Superadmin
    }

    // Login access lapses once `activeUntil` has passed
    pub fn access_expired(&self, now: DateTime<Utc>) -> bool {
        self.active_until.map_or(false, |until| until < now)
    }

    pub fn to_ref(&self) -> super::UserRef {
        super::UserRef {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
}

/// Public view of a user, with the team joined in.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub avatar_url: String,
    pub date_joined: DateTime<Utc>,
    pub phone_number: Option<String>,
    pub active_until: Option<DateTime<Utc>>,
    #[serde(rename = "TeamId")]
    pub team_id: Option<String>,
    #[serde(rename = "Team")]
    pub team: Option<TeamRef>,
}

impl UserResponse {
    pub fn new(user: &User, team: Option<TeamRef>) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            avatar_url: user.avatar_url.clone(),
            date_joined: user.date_joined,
            phone_number: user.phone_number.clone(),
            active_until: user.active_until,
            team_id: user.team_id.clone(),
            team,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserResponse,
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
}

// Admin-side user creation
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub phone_number: Option<String>,
    pub active_until: Option<DateTime<Utc>>,
    #[serde(rename = "TeamId")]
    pub team_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub phone_number: Option<String>,
    pub active_until: Option<DateTime<Utc>>,
    #[serde(rename = "TeamId")]
    pub team_id: Option<String>,
}
