// src/models/mod.rs
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub mod account;
pub use account::*;

pub mod plan;
pub use plan::*;

pub mod team;
pub use team::*;

pub mod user;
pub use user::*;

// JWT claims structure for authentication
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub id: String, // Subject (user ID)
    pub username: String,
    pub role: Role,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued at
}

/// Compact `{id, username}` reference used when a record embeds its creator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserRef {
    pub id: String,
    pub username: String,
}

// Custom error types
#[derive(Debug, Display)]
pub enum ServiceError {
    #[display(fmt = "Something went wrong!")]
    InternalServerError,
    #[display(fmt = "{}", _0)]
    BadRequest(String),
    #[display(fmt = "{}", _0)]
    Unauthorized(String),
    #[display(fmt = "{}", _0)]
    Forbidden(String),
    #[display(fmt = "{}", _0)]
    NotFound(String),
}

impl ServiceError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ServiceError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }
}

impl std::error::Error for ServiceError {}

// Every error leaves the service as `{ "error": "..." }`
impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

// Treats empty (or whitespace-only) strings as absent
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
