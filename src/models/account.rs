use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserRef;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    pub id: String,
    pub platform: String,
    pub username: String,
    pub link: Option<String>,
    #[serde(rename = "UserId")]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SocialAccount {
    pub fn new(platform: String, username: String, link: Option<String>, user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            platform,
            username,
            link,
            user_id: Some(user_id.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct AccountData {
    pub platform: Option<String>,
    pub username: Option<String>,
    pub link: Option<String>,
}

/// Account with the creating user joined in.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccountResponse {
    #[serde(flatten)]
    pub account: SocialAccount,
    #[serde(rename = "User")]
    pub user: Option<UserRef>,
}
