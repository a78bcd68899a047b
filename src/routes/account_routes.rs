use crate::models::{non_empty, AccountData, ServiceError, SocialAccount};
use crate::state::AppState;
use crate::utils::{account_storage, CurrentUser};
use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;

#[get("/accounts")]
async fn list_accounts(
    state: web::Data<AppState>,
    _user: CurrentUser,
) -> Result<HttpResponse, ServiceError> {
    let accounts = account_storage::list_accounts(&state.store)?;

    info!("✅ Found {} social accounts", accounts.len());

    Ok(HttpResponse::Ok().json(accounts))
}

#[post("/accounts")]
async fn create_account(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    data: web::Json<AccountData>,
) -> Result<HttpResponse, ServiceError> {
    let (platform, username) = match (non_empty(&data.platform), non_empty(&data.username)) {
        (Some(platform), Some(username)) => (platform, username),
        _ => return Err(ServiceError::bad_request("Platform and username are required")),
    };

    info!("📝 Adding {} account {} for user: {}", platform, username, user.id);

    let account = SocialAccount::new(
        platform.to_string(),
        username.to_string(),
        non_empty(&data.link).map(str::to_string),
        &user.id,
    );
    account_storage::save_account(&state.store, &account)?;

    info!("✅ Social account created: {}", account.id);

    Ok(HttpResponse::Created().json(account_storage::to_response(&state.store, account)?))
}

#[put("/accounts/{account_id}")]
async fn update_account(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
    data: web::Json<AccountData>,
) -> Result<HttpResponse, ServiceError> {
    let account_id = path.into_inner();

    let mut account = account_storage::find_account_by_id(&state.store, &account_id)?
        .ok_or_else(|| ServiceError::not_found("Account not found"))?;

    if let Some(platform) = non_empty(&data.platform) {
        account.platform = platform.to_string();
    }
    if let Some(username) = non_empty(&data.username) {
        account.username = username.to_string();
    }
    if let Some(link) = non_empty(&data.link) {
        account.link = Some(link.to_string());
    }

    account.updated_at = Utc::now();
    account_storage::save_account(&state.store, &account)?;

    info!("✅ Social account updated: {}", account.id);

    Ok(HttpResponse::Ok().json(account_storage::to_response(&state.store, account)?))
}

#[delete("/accounts/{account_id}")]
async fn delete_account(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let account_id = path.into_inner();

    if !account_storage::delete_account(&state.store, &account_id)? {
        error!("❌ Account not found: {}", account_id);
        return Err(ServiceError::not_found("Account not found"));
    }

    info!("🗑️ Social account deleted: {}", account_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Account deleted" })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_accounts)
        .service(create_account)
        .service(update_account)
        .service(delete_account);
}
