// src/services/plan_workflow.rs
//
// Rules applied before a plan is created or its status changes. The backend
// stores whatever it is sent; these checks run on the caller's side.

use crate::models::{ContentPlan, CreatePlanRequest, PlanStatus, UpdatePlanRequest};
use chrono::{Local, NaiveDate};
use derive_more::Display;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum WorkflowError {
    #[display(fmt = "Please fill in Title, Date, and select at least one Account")]
    MissingFields,
    #[display(fmt = "Status \"Posted\" can only be chosen when the posting date is today or earlier.")]
    PostingDateInFuture,
    #[display(fmt = "A link is required to change the status to Posted")]
    LinkRequired,
}

impl std::error::Error for WorkflowError {}

// Current date on the local clock
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

// True when the plan's calendar date has been reached
pub fn is_past_or_today(posting_date: NaiveDate, today: NaiveDate) -> bool {
    posting_date <= today
}

/// Gate for moving a plan to `target`. Only `posted` is conditional: the
/// posting date must have been reached and a non-empty link must accompany
/// the change.
pub fn check_status_change(
    posting_date: NaiveDate,
    target: PlanStatus,
    link: Option<&str>,
    today: NaiveDate,
) -> Result<(), WorkflowError> {
    if target != PlanStatus::Posted {
        return Ok(());
    }

    if !is_past_or_today(posting_date, today) {
        return Err(WorkflowError::PostingDateInFuture);
    }

    match link.map(str::trim) {
        Some(link) if !link.is_empty() => Ok(()),
        _ => Err(WorkflowError::LinkRequired),
    }
}

/// The create/edit form: one set of content fields for any number of accounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanForm {
    pub title: String,
    pub caption: Option<String>,
    pub script: Option<String>,
    pub posting_date: Option<NaiveDate>,
    pub link: Option<String>,
    pub resource_link: Option<String>,
    pub status: PlanStatus,
    pub account_ids: Vec<String>,
}

impl PlanForm {
    /// Form prefilled from a stored plan, bound to its current account.
    pub fn from_plan(plan: &ContentPlan) -> Self {
        Self {
            title: plan.title.clone(),
            caption: plan.caption.clone(),
            script: plan.script.clone(),
            posting_date: Some(plan.posting_date),
            link: plan.link.clone(),
            resource_link: plan.resource_link.clone(),
            status: plan.status,
            account_ids: plan.social_account_id.iter().cloned().collect(),
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<NaiveDate, WorkflowError> {
        let posting_date = match self.posting_date {
            Some(date) if !self.title.trim().is_empty() && !self.account_ids.is_empty() => date,
            _ => return Err(WorkflowError::MissingFields),
        };

        check_status_change(posting_date, self.status, self.link.as_deref(), today)?;
        Ok(posting_date)
    }

    fn create_request(&self, account_id: &str) -> CreatePlanRequest {
        CreatePlanRequest {
            title: Some(self.title.trim().to_string()),
            caption: self.caption.clone(),
            script: self.script.clone(),
            posting_date: self.posting_date,
            link: self.link.clone(),
            resource_link: self.resource_link.clone(),
            social_account_id: Some(account_id.to_string()),
            status: Some(self.status),
        }
    }

    /// One create request per selected account, identical content.
    pub fn create_requests(&self) -> Vec<CreatePlanRequest> {
        self.account_ids
            .iter()
            .map(|account_id| self.create_request(account_id))
            .collect()
    }

    /// Editing rebinds the plan to the first selected account; every further
    /// account receives a fresh copy. Caption and link are always sent, so an
    /// empty form field clears them; script and resource link are only sent
    /// when the form carries them.
    pub fn edit_requests(&self) -> (UpdatePlanRequest, Vec<CreatePlanRequest>) {
        let update = UpdatePlanRequest {
            title: Some(self.title.trim().to_string()),
            caption: Some(self.caption.clone().unwrap_or_default()),
            script: self.script.clone(),
            posting_date: self.posting_date,
            link: Some(self.link.clone().unwrap_or_default()),
            resource_link: self.resource_link.clone(),
            social_account_id: self.account_ids.first().cloned(),
            status: Some(self.status),
            ..Default::default()
        };

        let extras = self
            .account_ids
            .iter()
            .skip(1)
            .map(|account_id| self.create_request(account_id))
            .collect();

        (update, extras)
    }
}
