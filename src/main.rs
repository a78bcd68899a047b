//Third-party-dependencies
use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use log::{error, info};

use content_planner::config::AppConfig;
use content_planner::routes;
use content_planner::services::seed;
use content_planner::state::AppState;
use content_planner::utils::{fs_utils, json_config, query_config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let address = config.bind_address();

    let state = AppState::init(config.clone()).map_err(|e| {
        error!("❌ Failed to open storage at {}: {}", config.data_dir.display(), e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    // A fresh install always has someone who can log in
    if let Err(e) = seed::ensure_default_admin(&state.store, config.bcrypt_cost) {
        error!("❌ Failed to bootstrap default admin: {}", e);
    }

    fs_utils::ensure_directory(&config.upload_dir.join(fs_utils::AVATARS_DIR))?;

    info!("🚀 Server started at http://{}", address);

    let data = web::Data::new(state);
    HttpServer::new(move || {
        let cors = config
            .cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(data.clone())
            .app_data(json_config())
            .app_data(query_config())
            .service(actix_files::Files::new("/uploads", config.upload_dir.clone()))
            .configure(routes::init_routes)
    })
    .bind(address)?
    .run()
    .await
}
