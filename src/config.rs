// src/config.rs
use std::env;
use std::path::PathBuf;

use log::warn;

const DEFAULT_JWT_SECRET: &str = "content_planner_dev_secret";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_days: 7,
            bcrypt_cost: 10,
            data_dir: PathBuf::from("./storage"),
            upload_dir: PathBuf::from("./uploads"),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:5174".to_string(),
            ],
        }
    }
}

impl AppConfig {
    // Read settings from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("⚠️ JWT_SECRET not set, using the development secret");
            defaults.jwt_secret.clone()
        });

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
            jwt_secret,
            token_ttl_days: parse_var("TOKEN_TTL_DAYS").unwrap_or(defaults.token_ttl_days),
            bcrypt_cost: parse_var("BCRYPT_COST").unwrap_or(defaults.bcrypt_cost),
            data_dir: env::var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            upload_dir: env::var("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| split_origins(&origins))
                .unwrap_or(defaults.cors_origins),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("⚠️ Ignoring invalid value for {}: {}", key, raw);
            None
        }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            split_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
    }
}
