use crate::models::{non_empty, CreateUserRequest, Role, ServiceError, UpdateUserRequest, User};
use crate::state::AppState;
use crate::utils::{is_valid_email, password, team_storage, user_storage, Superadmin};
use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;

// A TeamId in a body must name an existing team; empty means "no team"
fn resolve_team(state: &AppState, team_id: &Option<String>) -> Result<Option<String>, ServiceError> {
    match non_empty(team_id) {
        None => Ok(None),
        Some(team_id) => match team_storage::find_team_by_id(&state.store, team_id)? {
            Some(team) => Ok(Some(team.id)),
            None => Err(ServiceError::bad_request("Team not found")),
        },
    }
}

#[get("/users")]
async fn list_users(
    state: web::Data<AppState>,
    Superadmin(admin): Superadmin,
) -> Result<HttpResponse, ServiceError> {
    info!("📋 Listing users for: {}", admin.username);

    let users = user_storage::list_user_responses(&state.store)?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "users": users })))
}

#[get("/users/{user_id}")]
async fn get_user(
    state: web::Data<AppState>,
    _admin: Superadmin,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();

    let user = user_storage::find_user_by_id(&state.store, &user_id)?
        .ok_or_else(|| ServiceError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": user_storage::to_response(&state.store, &user)?
    })))
}

#[post("/users")]
async fn create_user(
    state: web::Data<AppState>,
    Superadmin(admin): Superadmin,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ServiceError> {
    let (username, email, plain) = match (
        non_empty(&body.username),
        non_empty(&body.email),
        non_empty(&body.password),
    ) {
        (Some(username), Some(email), Some(plain)) => (username, email, plain),
        _ => {
            return Err(ServiceError::bad_request(
                "Username, email and password are required",
            ))
        }
    };

    if !is_valid_email(email) {
        return Err(ServiceError::bad_request("Invalid email address"));
    }

    info!("👤 {} is creating user: {}", admin.username, username);

    let user = {
        let _guard = state.store.exclusive()?;

        if user_storage::username_or_email_taken(&state.store, username, email)? {
            error!("❌ Username or email already exists: {} / {}", username, email);
            return Err(ServiceError::bad_request("Username or email already exists"));
        }

        let mut user = User::new(
            username.to_string(),
            email.to_string(),
            password::hash_password(plain, state.config.bcrypt_cost)?,
            body.role.unwrap_or(Role::User),
        );
        user.phone_number = non_empty(&body.phone_number).map(str::to_string);
        user.active_until = body.active_until;
        user.team_id = resolve_team(&state, &body.team_id)?;

        user_storage::save_user(&state.store, &user)?;
        user
    };

    info!("✅ User created: {}", user.id);

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "user": user_storage::to_response(&state.store, &user)?
    })))
}

#[put("/users/{user_id}")]
async fn update_user(
    state: web::Data<AppState>,
    Superadmin(admin): Superadmin,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();

    info!("✏️ {} is updating user: {}", admin.username, user_id);

    let user = {
        let _guard = state.store.exclusive()?;

        let mut user = user_storage::find_user_by_id(&state.store, &user_id)?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;

        if let Some(username) = non_empty(&body.username) {
            if let Some(other) = user_storage::find_user_by_username(&state.store, username)? {
                if other.id != user.id {
                    return Err(ServiceError::bad_request("Username or email already exists"));
                }
            }
            user.username = username.to_string();
        }

        if let Some(email) = non_empty(&body.email) {
            if !is_valid_email(email) {
                return Err(ServiceError::bad_request("Invalid email address"));
            }
            if let Some(other) = user_storage::find_user_by_email(&state.store, email)? {
                if other.id != user.id {
                    return Err(ServiceError::bad_request("Username or email already exists"));
                }
            }
            user.email = email.to_string();
        }

        if let Some(plain) = non_empty(&body.password) {
            user.password_hash = password::hash_password(plain, state.config.bcrypt_cost)?;
        }
        if let Some(role) = body.role {
            user.role = role;
        }
        if let Some(phone) = non_empty(&body.phone_number) {
            user.phone_number = Some(phone.to_string());
        }
        if body.active_until.is_some() {
            user.active_until = body.active_until;
        }
        if body.team_id.is_some() {
            user.team_id = resolve_team(&state, &body.team_id)?;
        }

        user.updated_at = Utc::now();
        user_storage::save_user(&state.store, &user)?;
        user
    };

    info!("✅ User updated: {}", user.id);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": user_storage::to_response(&state.store, &user)?
    })))
}

#[delete("/users/{user_id}")]
async fn delete_user(
    state: web::Data<AppState>,
    Superadmin(admin): Superadmin,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();

    if user_id == admin.id {
        error!("❌ {} tried to delete their own account", admin.username);
        return Err(ServiceError::bad_request("Cannot delete your own account"));
    }

    if !user_storage::delete_user(&state.store, &user_id)? {
        return Err(ServiceError::not_found("User not found"));
    }

    info!("✅ User deleted: {}", user_id);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User deleted successfully"
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user);
}
