// Reset storage and load the demo dataset
use content_planner::config::AppConfig;
use content_planner::services::{plan_workflow, seed};
use content_planner::state::AppState;
use log::{error, info};

fn main() {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    info!("🌱 Seeding storage at {}", config.data_dir.display());

    let result = AppState::init(config).and_then(|state| {
        seed::seed_demo_data(
            &state.store,
            state.config.bcrypt_cost,
            plan_workflow::local_today(),
        )
    });

    match result {
        Ok(report) => info!(
            "✅ Seeded {} team(s), {} user(s), {} account(s), {} plan(s)",
            report.teams, report.users, report.accounts, report.plans
        ),
        Err(e) => {
            error!("❌ Seeding failed: {}", e);
            std::process::exit(1);
        }
    }
}
