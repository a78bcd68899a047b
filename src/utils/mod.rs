// src/utils/mod.rs
use crate::models::{Claims, ServiceError, User};
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{dev::ServiceRequest, web, FromRequest, HttpMessage, HttpRequest};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use log::{debug, error};
use regex::Regex;
use std::fs;
use std::path::Path;

pub mod account_storage;
pub mod plan_storage;
pub mod record_store;
pub mod team_storage;
pub mod user_storage;

// JWT utility functions
pub mod jwt {
    use super::*;

    // Generate a new JWT token for a user
    pub fn generate_token(user: &User, secret: &str, ttl_days: i64) -> Result<String, ServiceError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(Duration::days(ttl_days))
            .ok_or(ServiceError::InternalServerError)?
            .timestamp() as usize;

        let claims = Claims {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            exp: expiration,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .map_err(|e| {
            error!("❌ Failed to sign token: {:?}", e);
            ServiceError::InternalServerError
        })
    }

    // Validate and decode a JWT token
    pub fn decode_token(token: &str, secret: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!("Rejected token: {:?}", e);
            ServiceError::Unauthorized("Invalid token.".to_string())
        })
    }

    // Extract JWT from Authorization header
    pub fn extract_token_from_header(auth_header: &str) -> Result<String, ServiceError> {
        match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(no_token()),
        }
    }

    pub(crate) fn no_token() -> ServiceError {
        ServiceError::Unauthorized("Access denied. No token provided.".to_string())
    }
}

// Password utility functions
pub mod password {
    use super::*;

    // Hash a password using bcrypt
    pub fn hash_password(password: &str, cost: u32) -> Result<String, ServiceError> {
        hash(password, cost).map_err(|e| {
            error!("❌ Failed to hash password: {:?}", e);
            ServiceError::InternalServerError
        })
    }

    // Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
        verify(password, hash).map_err(|e| {
            error!("❌ Failed to verify password: {:?}", e);
            ServiceError::InternalServerError
        })
    }
}

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles");
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// The authenticated caller, re-read from storage on every request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or_else(jwt::no_token),
        )
    }
}

/// An authenticated caller holding the superadmin role.
#[derive(Debug, Clone)]
pub struct Superadmin(pub User);

impl FromRequest for Superadmin {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.extensions().get::<CurrentUser>() {
            Some(CurrentUser(user)) if user.is_superadmin() => Ok(Superadmin(user.clone())),
            Some(_) => Err(ServiceError::Forbidden(
                "Access denied. Superadmin only.".to_string(),
            )),
            None => Err(jwt::no_token()),
        };
        ready(result)
    }
}

// Resolve the bearer token on a request into a stored user
fn authenticate(req: &ServiceRequest) -> Result<User, ServiceError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        error!("❌ Application state missing from request");
        ServiceError::InternalServerError
    })?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(jwt::no_token)?;

    let token = jwt::extract_token_from_header(auth_header)?;
    let claims = jwt::decode_token(&token, &state.config.jwt_secret)?;

    user_storage::find_user_by_id(&state.store, &claims.id)?
        .ok_or_else(|| ServiceError::Unauthorized("User not found.".to_string()))
}

// Middleware for JWT authentication
pub mod auth_middleware {
    use super::*;
    use actix_web::body::EitherBody;
    use actix_web::dev::{forward_ready, Service, ServiceResponse, Transform};
    use actix_web::{Error, ResponseError};
    use futures::future::ok;
    use std::future::Future;
    use std::pin::Pin;

    pub struct Authentication;

    impl<S, B> Transform<S, ServiceRequest> for Authentication
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<EitherBody<B>>;
        type Error = Error;
        type Transform = AuthenticationMiddleware<S>;
        type InitError = ();
        type Future = Ready<Result<Self::Transform, Self::InitError>>;

        fn new_transform(&self, service: S) -> Self::Future {
            ok(AuthenticationMiddleware { service })
        }
    }

    pub struct AuthenticationMiddleware<S> {
        service: S,
    }

    impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<EitherBody<B>>;
        type Error = Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

        forward_ready!(service);

        fn call(&self, req: ServiceRequest) -> Self::Future {
            match authenticate(&req) {
                Ok(user) => {
                    // Add the caller to the request extensions
                    req.extensions_mut().insert(CurrentUser(user));
                    let fut = self.service.call(req);
                    Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
                }
                Err(err) => {
                    debug!("Rejected {} {}: {}", req.method(), req.path(), err);
                    let response = req.into_response(err.error_response()).map_into_right_body();
                    Box::pin(async move { Ok(response) })
                }
            }
        }
    }
}

// Extractor configs so malformed bodies and queries share the `{ error }` shape
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1024 * 1024)
        .error_handler(|err, _req| ServiceError::BadRequest(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ServiceError::BadRequest(err.to_string()).into())
}

// File system utilities
pub mod fs_utils {
    use super::*;
    use std::io;

    pub const AVATARS_DIR: &str = "avatars";

    pub fn ensure_directory(dir: &Path) -> io::Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    // Store an avatar image and return its path relative to the upload root
    pub fn save_avatar(
        upload_dir: &Path,
        user_id: &str,
        extension: &str,
        bytes: &[u8],
    ) -> io::Result<String> {
        let avatars_dir = upload_dir.join(AVATARS_DIR);
        ensure_directory(&avatars_dir)?;

        let file_name = format!("{}-{}.{}", user_id, uuid::Uuid::new_v4(), extension);
        fs::write(avatars_dir.join(&file_name), bytes)?;

        Ok(format!("{}/{}", AVATARS_DIR, file_name))
    }
}
