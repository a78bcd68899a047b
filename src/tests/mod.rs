// In-process HTTP tests against a throwaway storage directory

use crate::config::AppConfig;
use crate::models::{Role, SocialAccount, User};
use crate::services::seed;
use crate::state::AppState;
use crate::utils::{jwt, password, user_storage};
use tempfile::TempDir;

// Builds the full service over a context's state
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.state.clone()))
                .app_data($crate::utils::json_config())
                .app_data($crate::utils::query_config())
                .configure($crate::routes::init_routes),
        )
        .await
    };
}

mod admin_tests;
mod auth_tests;

pub const TEST_PASSWORD: &str = "secret123";

// Lowest cost bcrypt accepts
pub const TEST_BCRYPT_COST: u32 = 4;

pub struct TestContext {
    pub state: AppState,
    pub dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            jwt_secret: "test-secret".to_string(),
            bcrypt_cost: TEST_BCRYPT_COST,
            data_dir: dir.path().join("data"),
            upload_dir: dir.path().join("uploads"),
            ..AppConfig::default()
        };
        let state = AppState::init(config).unwrap();
        seed::ensure_default_admin(&state.store, TEST_BCRYPT_COST).unwrap();

        Self { state, dir }
    }

    pub fn admin(&self) -> User {
        user_storage::find_user_by_username(&self.state.store, seed::DEFAULT_ADMIN_USERNAME)
            .unwrap()
            .unwrap()
    }

    pub fn add_user(&self, username: &str) -> User {
        let user = User::new(
            username.to_string(),
            format!("{}@content.com", username),
            password::hash_password(TEST_PASSWORD, TEST_BCRYPT_COST).unwrap(),
            Role::User,
        );
        user_storage::save_user(&self.state.store, &user).unwrap();
        user
    }

    pub fn add_account(&self, platform: &str, username: &str, owner: &User) -> SocialAccount {
        let account = SocialAccount::new(platform.to_string(), username.to_string(), None, &owner.id);
        self.state.store.save(&account).unwrap();
        account
    }

    pub fn token_for(&self, user: &User) -> String {
        jwt::generate_token(user, &self.state.config.jwt_secret, 7).unwrap()
    }

    pub fn admin_token(&self) -> String {
        self.token_for(&self.admin())
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
