// src/utils/plan_storage.rs
use crate::models::{
    AccountRef, ContentPlan, PlanQuery, PlanResponse, ServiceError, SocialAccount, User, UserRef,
};
use crate::utils::record_store::Store;
use std::collections::HashMap;

pub fn save_plan(store: &Store, plan: &ContentPlan) -> Result<(), ServiceError> {
    store.save(plan)
}

pub fn find_plan_by_id(store: &Store, id: &str) -> Result<Option<ContentPlan>, ServiceError> {
    store.find(id)
}

pub fn delete_plan(store: &Store, id: &str) -> Result<bool, ServiceError> {
    store.delete::<ContentPlan>(id)
}

fn account_ref(account: &SocialAccount) -> AccountRef {
    AccountRef {
        id: account.id.clone(),
        platform: account.platform.clone(),
        username: account.username.clone(),
    }
}

// Plan with account and creator joined in
pub fn to_response(store: &Store, plan: ContentPlan) -> Result<PlanResponse, ServiceError> {
    let social_account = match &plan.social_account_id {
        Some(id) => store.find::<SocialAccount>(id)?.as_ref().map(account_ref),
        None => None,
    };
    let user = match &plan.user_id {
        Some(id) => store.find::<User>(id)?.map(|user| user.to_ref()),
        None => None,
    };

    Ok(PlanResponse {
        plan,
        social_account,
        user,
    })
}

// Matching plans ordered by posting date, with associations joined in
pub fn list_plans(store: &Store, query: &PlanQuery) -> Result<Vec<PlanResponse>, ServiceError> {
    let accounts: HashMap<String, AccountRef> = store
        .list::<SocialAccount>()?
        .iter()
        .map(|account| (account.id.clone(), account_ref(account)))
        .collect();
    let users: HashMap<String, UserRef> = store
        .list::<User>()?
        .iter()
        .map(|user| (user.id.clone(), user.to_ref()))
        .collect();

    let mut plans: Vec<ContentPlan> = store
        .list::<ContentPlan>()?
        .into_iter()
        .filter(|plan| query.matches(plan))
        .collect();
    plans.sort_by(|a, b| {
        a.posting_date
            .cmp(&b.posting_date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });

    Ok(plans
        .into_iter()
        .map(|plan| {
            let social_account = plan
                .social_account_id
                .as_ref()
                .and_then(|id| accounts.get(id))
                .cloned();
            let user = plan.user_id.as_ref().and_then(|id| users.get(id)).cloned();
            PlanResponse {
                plan,
                social_account,
                user,
            }
        })
        .collect())
}
