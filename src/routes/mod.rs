// src/routes/mod.rs
pub mod account_routes;
pub mod auth_routes;
pub mod plan_routes;
pub mod team_routes;
pub mod user_routes;

use crate::utils::auth_middleware::Authentication;
use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "message": "Content Planner API is running"
    }))
}

// Everything lives under /api; only health, register and login skip the token check
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health)
            .configure(auth_routes::init_public_routes)
            .service(
                web::scope("")
                    .wrap(Authentication)
                    .configure(auth_routes::init_routes)
                    .configure(user_routes::init_routes)
                    .configure(team_routes::init_routes)
                    .configure(account_routes::init_routes)
                    .configure(plan_routes::init_routes),
            ),
    );
}
