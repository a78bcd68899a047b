// src/services/seed.rs
use crate::models::{ContentPlan, PlanStatus, Role, ServiceError, SocialAccount, Team, User};
use crate::utils::record_store::Store;
use crate::utils::{password, user_storage};
use chrono::{Duration, NaiveDate};
use log::info;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@content.com";

// Create the default superadmin when no `admin` user exists
pub fn ensure_default_admin(store: &Store, bcrypt_cost: u32) -> Result<Option<User>, ServiceError> {
    let _guard = store.exclusive()?;

    if user_storage::find_user_by_username(store, DEFAULT_ADMIN_USERNAME)?.is_some() {
        return Ok(None);
    }

    let admin = default_admin(bcrypt_cost)?;
    user_storage::save_user(store, &admin)?;
    info!("✅ Default superadmin created ({} / {})", DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD);

    Ok(Some(admin))
}

fn default_admin(bcrypt_cost: u32) -> Result<User, ServiceError> {
    Ok(User::new(
        DEFAULT_ADMIN_USERNAME.to_string(),
        DEFAULT_ADMIN_EMAIL.to_string(),
        password::hash_password(DEFAULT_ADMIN_PASSWORD, bcrypt_cost)?,
        Role::Superadmin,
    ))
}

#[derive(Debug, Default, PartialEq)]
pub struct SeedReport {
    pub teams: usize,
    pub users: usize,
    pub accounts: usize,
    pub plans: usize,
}

// (title, caption, days from today, status, account index, link)
const DEMO_PLANS: &[(&str, &str, i64, PlanStatus, usize, Option<&str>)] = &[
    ("New Feature Teaser", "Something big is coming... #staytuned", 7, PlanStatus::Draft, 0, None),
    ("Office Tour", "Where the magic happens. #officelife", 12, PlanStatus::Draft, 0, None),
    ("CEO Interview", "Vision for 2026.", 8, PlanStatus::Scripting, 0, None),
    ("Team Sizzle Reel", "Meet the squad.", -5, PlanStatus::Posted, 0, Some("https://instagram.com/p/12345")),
    ("Community Update", "Join our group!", 3, PlanStatus::Ready, 1, None),
    ("Product Launch Event", "Live this Sunday.", 10, PlanStatus::Draft, 1, None),
    ("Blog Post Share", "Read about our journey.", -2, PlanStatus::Posted, 1, Some("https://facebook.com/post/1")),
    ("Full Tutorial 2026", "Master the basics.", 15, PlanStatus::Scripting, 2, None),
    ("Vlog: Day 1", "Starting fresh.", 2, PlanStatus::Shooting, 2, None),
    ("Tech Review", "Best mics for podcasting.", 20, PlanStatus::Draft, 2, None),
    ("Quick Tip #1", "Use shortcuts.", 1, PlanStatus::Ready, 3, None),
    ("Thread: Marketing 101", "A thread", 5, PlanStatus::Draft, 3, None),
    ("Poll: Feature Request", "Vote now!", -1, PlanStatus::Posted, 3, Some("https://twitter.com/status/1")),
    ("Viral Challenge", "We tried it.", 4, PlanStatus::Shooting, 4, None),
    ("Behind The Scenes", "How we edit.", 6, PlanStatus::Editing, 4, None),
    ("Funny Skit", "POV: Developer life.", 9, PlanStatus::Scripting, 4, None),
    ("App Showcase", "Check this out.", -10, PlanStatus::Posted, 4, Some("https://tiktok.com/video/1")),
];

const DEMO_ACCOUNTS: &[(&str, &str, &str)] = &[
    ("Instagram", "content_planner_ig", "https://instagram.com/content_planner"),
    ("Facebook", "Content Planner FB", "https://facebook.com/contentplanner"),
    ("YouTube", "Content Planner TV", "https://youtube.com/contentplanner"),
    ("Twitter", "content_twit", "https://twitter.com/content_planner"),
    ("TikTok", "creative_daily_tt", "https://tiktok.com/@creative_daily"),
];

/// Wipe storage and load the demo dataset, dated around `today`.
pub fn seed_demo_data(store: &Store, bcrypt_cost: u32, today: NaiveDate) -> Result<SeedReport, ServiceError> {
    store.clear()?;

    info!("🌱 Seeding Teams...");
    let team = Team::new(
        "Creative Team".to_string(),
        Some("Main content creation team".to_string()),
    );
    store.save(&team)?;

    info!("🌱 Seeding Users...");
    let mut admin = default_admin(bcrypt_cost)?;
    admin.team_id = Some(team.id.clone());
    store.save(&admin)?;

    info!("🌱 Seeding Social Accounts...");
    let mut accounts = Vec::with_capacity(DEMO_ACCOUNTS.len());
    for (platform, username, link) in DEMO_ACCOUNTS {
        let account = SocialAccount::new(
            platform.to_string(),
            username.to_string(),
            Some(link.to_string()),
            &admin.id,
        );
        store.save(&account)?;
        accounts.push(account);
    }

    info!("🌱 Seeding Content Plans...");
    for (title, caption, offset, status, account_index, link) in DEMO_PLANS {
        let mut plan = ContentPlan::new(
            title.to_string(),
            today + Duration::days(*offset),
            &accounts[*account_index].id,
            &admin.id,
        );
        plan.caption = Some(caption.to_string());
        plan.status = *status;
        plan.link = link.map(str::to_string);
        store.save(&plan)?;
    }

    info!("✨ Database seeding completed successfully!");

    Ok(SeedReport {
        teams: 1,
        users: 1,
        accounts: accounts.len(),
        plans: DEMO_PLANS.len(),
    })
}
