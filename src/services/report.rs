// src/services/report.rs
use crate::models::{PlanResponse, PlanStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const TOP_CONTENT_LIMIT: usize = 5;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MetricTotals {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlatformTotals {
    pub platform: String,
    pub plans: usize,
    pub views: u64,
}

// One row of the "viral content" table
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TopContent {
    pub id: String,
    pub title: String,
    pub platform: Option<String>,
    pub account: Option<String>,
    pub link: Option<String>,
    pub views: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub totals: MetricTotals,
    pub by_platform: Vec<PlatformTotals>,
    pub top_content: Vec<TopContent>,
}

/// Dashboard figures over a set of plans.
pub fn summarize(plans: &[PlanResponse]) -> PlanSummary {
    let mut by_status: BTreeMap<String, usize> = PlanStatus::ALL
        .iter()
        .map(|status| (status.as_str().to_string(), 0))
        .collect();
    let mut totals = MetricTotals::default();
    let mut platforms: BTreeMap<String, PlatformTotals> = BTreeMap::new();

    for entry in plans {
        let plan = &entry.plan;
        *by_status.entry(plan.status.as_str().to_string()).or_insert(0) += 1;

        totals.views = totals.views.saturating_add(plan.views);
        totals.likes = totals.likes.saturating_add(plan.likes);
        totals.comments = totals.comments.saturating_add(plan.comments);

        let platform = entry
            .social_account
            .as_ref()
            .map(|account| account.platform.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let row = platforms
            .entry(platform.to_lowercase())
            .or_insert_with(|| PlatformTotals {
                platform,
                plans: 0,
                views: 0,
            });
        row.plans += 1;
        row.views = row.views.saturating_add(plan.views);
    }

    let mut posted: Vec<&PlanResponse> = plans
        .iter()
        .filter(|entry| entry.plan.status == PlanStatus::Posted)
        .collect();
    posted.sort_by(|a, b| b.plan.views.cmp(&a.plan.views));

    let top_content = posted
        .into_iter()
        .take(TOP_CONTENT_LIMIT)
        .map(|entry| TopContent {
            id: entry.plan.id.clone(),
            title: entry.plan.title.clone(),
            platform: entry.social_account.as_ref().map(|a| a.platform.clone()),
            account: entry.social_account.as_ref().map(|a| a.username.clone()),
            link: entry.plan.link.clone(),
            views: entry.plan.views,
        })
        .collect();

    PlanSummary {
        total: plans.len(),
        by_status,
        totals,
        by_platform: platforms.into_values().collect(),
        top_content,
    }
}
