use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use super::UserRef;

/// Production stage of a content plan, in board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Draft,
    Scripting,
    Shooting,
    Editing,
    Ready,
    Posted,
}

impl PlanStatus {
    pub const ALL: [PlanStatus; 6] = [
        PlanStatus::Draft,
        PlanStatus::Scripting,
        PlanStatus::Shooting,
        PlanStatus::Editing,
        PlanStatus::Ready,
        PlanStatus::Posted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Scripting => "scripting",
            PlanStatus::Shooting => "shooting",
            PlanStatus::Editing => "editing",
            PlanStatus::Ready => "ready",
            PlanStatus::Posted => "posted",
        }
    }
}

impl Default for PlanStatus {
    fn default() -> Self {
        PlanStatus::Draft
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContentPlan {
    pub id: String,
    pub title: String,
    pub caption: Option<String>,
    pub script: Option<String>,
    pub posting_date: NaiveDate,
    pub link: Option<String>,
    pub resource_link: Option<String>,
    pub status: PlanStatus,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    #[serde(rename = "SocialAccountId")]
    pub social_account_id: Option<String>,
    #[serde(rename = "UserId")]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentPlan {
    pub fn new(title: String, posting_date: NaiveDate, social_account_id: &str, user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            caption: None,
            script: None,
            posting_date,
            link: None,
            resource_link: None,
            status: PlanStatus::Draft,
            views: 0,
            likes: 0,
            comments: 0,
            social_account_id: Some(social_account_id.to_string()),
            user_id: Some(user_id.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp; only the calendar date is kept.
pub fn parse_posting_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

fn deserialize_posting_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_posting_date(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid postingDate `{}`", value))),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, deserialize_with = "deserialize_posting_date")]
    pub posting_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_link: Option<String>,
    pub social_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlanStatus>,
}

/// Partial update: `None` leaves the stored value untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_posting_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub posting_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlanStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AccountRef {
    pub id: String,
    pub platform: String,
    pub username: String,
}

/// Plan with its social account and creator joined in.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlanResponse {
    #[serde(flatten)]
    pub plan: ContentPlan,
    #[serde(rename = "SocialAccount")]
    pub social_account: Option<AccountRef>,
    #[serde(rename = "User")]
    pub user: Option<UserRef>,
}

// Filters for the plan listing
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanQuery {
    pub account_id: Option<String>,
    pub status: Option<PlanStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl PlanQuery {
    pub fn matches(&self, plan: &ContentPlan) -> bool {
        if let Some(account_id) = &self.account_id {
            if plan.social_account_id.as_deref() != Some(account_id.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if plan.status != status {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if plan.posting_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if plan.posting_date > to {
                return false;
            }
        }
        true
    }
}
