use crate::models::{
    non_empty, AuthResponse, LoginRequest, RegisterRequest, Role, ServiceError, UpdateProfileRequest,
    User,
};
use crate::state::AppState;
use crate::utils::{fs_utils, is_valid_email, jwt, password, user_storage, CurrentUser};
use actix_multipart::Multipart;
use actix_web::{get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use futures::StreamExt;
use log::{debug, error, info, warn};
use serde_json::json;

const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

// Register a new user and log them straight in
#[post("/auth/register")]
async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
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

    info!("📝 Register request for username: {}", username);

    if !is_valid_email(email) {
        return Err(ServiceError::bad_request("Invalid email address"));
    }

    let user = {
        let _guard = state.store.exclusive()?;

        if user_storage::username_or_email_taken(&state.store, username, email)? {
            error!("❌ Username or email already registered: {} / {}", username, email);
            return Err(ServiceError::bad_request("Username or email already exists"));
        }

        let user = User::new(
            username.to_string(),
            email.to_string(),
            password::hash_password(plain, state.config.bcrypt_cost)?,
            Role::User,
        );
        user_storage::save_user(&state.store, &user)?;
        user
    };

    let token = jwt::generate_token(&user, &state.config.jwt_secret, state.config.token_ttl_days)?;

    info!("✅ User registered successfully: {}", user.id);

    Ok(HttpResponse::Created().json(AuthResponse {
        success: true,
        user: user_storage::to_response(&state.store, &user)?,
        token,
    }))
}

// Login and get JWT token
#[post("/auth/login")]
async fn login(
    state: web::Data<AppState>,
    credentials: web::Json<LoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    let invalid = || ServiceError::Unauthorized("Invalid credentials".to_string());

    let (username, plain) = match (non_empty(&credentials.username), non_empty(&credentials.password)) {
        (Some(username), Some(plain)) => (username, plain),
        _ => {
            error!("❌ Login request without username or password");
            return Err(invalid());
        }
    };

    info!("🔑 Login request for username: {}", username);

    let user = match user_storage::find_user_by_username(&state.store, username)? {
        Some(user) => user,
        None => {
            error!("❌ User not found: {}", username);
            return Err(invalid());
        }
    };

    if !password::verify_password(plain, &user.password_hash)? {
        error!("❌ Invalid password for user: {}", username);
        return Err(invalid());
    }

    if user.access_expired(Utc::now()) {
        warn!("⚠️ Access expired for user: {}", user.id);
        return Err(ServiceError::Unauthorized(
            "Account access has expired".to_string(),
        ));
    }

    let token = jwt::generate_token(&user, &state.config.jwt_secret, state.config.token_ttl_days)?;

    info!("✅ User logged in successfully: {}", user.id);

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        user: user_storage::to_response(&state.store, &user)?,
        token,
    }))
}

// Get current user info
#[get("/auth/me")]
async fn me(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<HttpResponse, ServiceError> {
    debug!("👤 Get user info request: {}", user.id);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": user_storage::to_response(&state.store, &user)?
    })))
}

#[put("/auth/profile")]
async fn update_profile(
    state: web::Data<AppState>,
    CurrentUser(current): CurrentUser,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("✏️ Profile update for user: {}", current.id);

    let user = {
        let _guard = state.store.exclusive()?;

        // Re-read under the lock so concurrent edits don't resurrect old values
        let mut user = user_storage::find_user_by_id(&state.store, &current.id)?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;

        if let Some(username) = non_empty(&body.username) {
            if username != user.username {
                if let Some(other) = user_storage::find_user_by_username(&state.store, username)? {
                    if other.id != user.id {
                        return Err(ServiceError::bad_request("Username or email already exists"));
                    }
                }
                user.username = username.to_string();
            }
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

        if let Some(phone) = non_empty(&body.phone_number) {
            user.phone_number = Some(phone.to_string());
        }
        if let Some(avatar_url) = non_empty(&body.avatar_url) {
            user.avatar_url = avatar_url.to_string();
        }

        user.updated_at = Utc::now();
        user_storage::save_user(&state.store, &user)?;
        user
    };

    info!("✅ Profile updated: {}", user.id);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": user_storage::to_response(&state.store, &user)?
    })))
}

// Raster formats only
fn avatar_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

// Upload an avatar image (multipart field `image`)
#[post("/auth/avatar")]
async fn upload_avatar(
    req: HttpRequest,
    state: web::Data<AppState>,
    CurrentUser(current): CurrentUser,
    mut payload: Multipart,
) -> Result<HttpResponse, ServiceError> {
    info!("🖼️ Avatar upload for user: {}", current.id);

    let mut upload: Option<(&'static str, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            error!("❌ Error processing multipart field: {:?}", e);
            ServiceError::bad_request("Invalid multipart payload")
        })?;

        if field.name() != Some("image") {
            debug!("Skipping multipart field: {:?}", field.name());
            continue;
        }

        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();
        let extension = avatar_extension(&content_type)
            .ok_or_else(|| ServiceError::bad_request("Only image files are allowed!"))?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| {
                error!("❌ Error reading upload chunk: {:?}", e);
                ServiceError::bad_request("Invalid multipart payload")
            })?;
            if bytes.len() + data.len() > MAX_AVATAR_BYTES {
                return Err(ServiceError::bad_request("File too large (max 5MB)"));
            }
            bytes.extend_from_slice(&data);
        }

        upload = Some((extension, bytes));
    }

    let (extension, bytes) =
        upload.ok_or_else(|| ServiceError::bad_request("No file uploaded"))?;

    let conn = req.connection_info();
    let base_url = format!("{}://{}/uploads", conn.scheme(), conn.host());

    let (user, avatar_url) = {
        let _guard = state.store.exclusive()?;
        let mut user = user_storage::find_user_by_id(&state.store, &current.id)?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;

        let relative = fs_utils::save_avatar(&state.config.upload_dir, &user.id, extension, &bytes)
            .map_err(|e| {
                error!("❌ Failed to store avatar: {:?}", e);
                ServiceError::InternalServerError
            })?;
        let avatar_url = format!("{}/{}", base_url, relative);

        user.avatar_url = avatar_url.clone();
        user.updated_at = Utc::now();
        if let Err(e) = user_storage::save_user(&state.store, &user) {
            let _ = std::fs::remove_file(state.config.upload_dir.join(&relative));
            return Err(e);
        }
        (user, avatar_url)
    };

    info!("✅ Avatar stored at {}", avatar_url);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "avatarUrl": avatar_url,
        "user": user_storage::to_response(&state.store, &user)?
    })))
}

// Routes reachable without a token
pub fn init_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login);
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(me).service(update_profile).service(upload_avatar);
}
