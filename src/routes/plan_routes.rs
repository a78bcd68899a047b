use crate::models::{
    non_empty, ContentPlan, CreatePlanRequest, PlanQuery, ServiceError, UpdatePlanRequest,
};
use crate::services::report;
use crate::state::AppState;
use crate::utils::{account_storage, plan_storage, CurrentUser};
use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;

// Optional text: a present value overwrites, an empty one clears
fn optional_text(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn require_account(state: &AppState, account_id: &str) -> Result<String, ServiceError> {
    match account_storage::find_account_by_id(&state.store, account_id)? {
        Some(account) => Ok(account.id),
        None => {
            error!("❌ Social account not found: {}", account_id);
            Err(ServiceError::bad_request("Social account not found"))
        }
    }
}

#[get("/plans")]
async fn list_plans(
    state: web::Data<AppState>,
    _user: CurrentUser,
    query: web::Query<PlanQuery>,
) -> Result<HttpResponse, ServiceError> {
    let plans = plan_storage::list_plans(&state.store, &query)?;

    info!("✅ Found {} content plans", plans.len());

    Ok(HttpResponse::Ok().json(plans))
}

// Dashboard figures over the (optionally filtered) plans
#[get("/plans/summary")]
async fn plan_summary(
    state: web::Data<AppState>,
    _user: CurrentUser,
    query: web::Query<PlanQuery>,
) -> Result<HttpResponse, ServiceError> {
    let plans = plan_storage::list_plans(&state.store, &query)?;

    Ok(HttpResponse::Ok().json(report::summarize(&plans)))
}

#[post("/plans")]
async fn create_plan(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    body: web::Json<CreatePlanRequest>,
) -> Result<HttpResponse, ServiceError> {
    let body = body.into_inner();

    let (title, posting_date, account_id) = match (
        non_empty(&body.title),
        body.posting_date,
        non_empty(&body.social_account_id),
    ) {
        (Some(title), Some(date), Some(account_id)) => (title, date, account_id),
        _ => {
            return Err(ServiceError::bad_request(
                "Title, posting date and social account are required",
            ))
        }
    };

    let account_id = require_account(&state, account_id)?;

    info!("📝 Creating plan '{}' on account: {}", title, account_id);

    let mut plan = ContentPlan::new(title.to_string(), posting_date, &account_id, &user.id);
    plan.caption = body.caption.as_deref().and_then(optional_text);
    plan.script = body.script.as_deref().and_then(optional_text);
    plan.link = body.link.as_deref().and_then(optional_text);
    plan.resource_link = body.resource_link.as_deref().and_then(optional_text);
    if let Some(status) = body.status {
        plan.status = status;
    }

    plan_storage::save_plan(&state.store, &plan)?;

    info!("✅ Plan created: {}", plan.id);

    Ok(HttpResponse::Created().json(plan_storage::to_response(&state.store, plan)?))
}

// Partial update. The posted gate is not checked here.
#[put("/plans/{plan_id}")]
async fn update_plan(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
    body: web::Json<UpdatePlanRequest>,
) -> Result<HttpResponse, ServiceError> {
    let plan_id = path.into_inner();
    let body = body.into_inner();

    let mut plan = plan_storage::find_plan_by_id(&state.store, &plan_id)?
        .ok_or_else(|| ServiceError::not_found("Plan not found"))?;

    if let Some(title) = non_empty(&body.title) {
        plan.title = title.to_string();
    }
    if let Some(posting_date) = body.posting_date {
        plan.posting_date = posting_date;
    }
    if let Some(caption) = &body.caption {
        plan.caption = optional_text(caption);
    }
    if let Some(script) = &body.script {
        plan.script = optional_text(script);
    }
    if let Some(link) = &body.link {
        plan.link = optional_text(link);
    }
    if let Some(resource_link) = &body.resource_link {
        plan.resource_link = optional_text(resource_link);
    }
    if let Some(account_id) = non_empty(&body.social_account_id) {
        plan.social_account_id = Some(require_account(&state, account_id)?);
    }
    if let Some(status) = body.status {
        plan.status = status;
    }
    if let Some(views) = body.views {
        plan.views = views;
    }
    if let Some(likes) = body.likes {
        plan.likes = likes;
    }
    if let Some(comments) = body.comments {
        plan.comments = comments;
    }

    plan.updated_at = Utc::now();
    plan_storage::save_plan(&state.store, &plan)?;

    info!("✅ Plan updated: {} ({})", plan.id, plan.status);

    Ok(HttpResponse::Ok().json(plan_storage::to_response(&state.store, plan)?))
}

#[delete("/plans/{plan_id}")]
async fn delete_plan(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let plan_id = path.into_inner();

    if !plan_storage::delete_plan(&state.store, &plan_id)? {
        return Err(ServiceError::not_found("Plan not found"));
    }

    info!("🗑️ Plan deleted: {}", plan_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Plan deleted" })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(plan_summary)
        .service(list_plans)
        .service(create_plan)
        .service(update_plan)
        .service(delete_plan);
}
