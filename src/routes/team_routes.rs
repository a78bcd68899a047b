use crate::models::{non_empty, ServiceError, Team, TeamData};
use crate::state::AppState;
use crate::utils::{team_storage, Superadmin};
use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;

// Get all teams with their members
#[get("/teams")]
async fn list_teams(
    state: web::Data<AppState>,
    _admin: Superadmin,
) -> Result<HttpResponse, ServiceError> {
    info!("📋 Fetching teams");

    let teams = team_storage::list_teams_with_members(&state.store)?;

    info!("✅ Found {} teams", teams.len());

    Ok(HttpResponse::Ok().json(teams))
}

// Create a new team
#[post("/teams")]
async fn create_team(
    state: web::Data<AppState>,
    Superadmin(admin): Superadmin,
    team_data: web::Json<TeamData>,
) -> Result<HttpResponse, ServiceError> {
    let name = non_empty(&team_data.name)
        .ok_or_else(|| ServiceError::bad_request("Team name is required"))?;

    info!("📝 Creating new team: {} by: {}", name, admin.username);

    let team = {
        let _guard = state.store.exclusive()?;

        if team_storage::find_team_by_name(&state.store, name)?.is_some() {
            error!("❌ Team name already taken: {}", name);
            return Err(ServiceError::bad_request("Team name already exists"));
        }

        let team = Team::new(
            name.to_string(),
            non_empty(&team_data.description).map(str::to_string),
        );
        team_storage::save_team(&state.store, &team)?;
        team
    };

    info!("✅ Team created successfully: {}", team.id);

    Ok(HttpResponse::Created().json(team))
}

#[put("/teams/{team_id}")]
async fn update_team(
    state: web::Data<AppState>,
    _admin: Superadmin,
    path: web::Path<String>,
    team_data: web::Json<TeamData>,
) -> Result<HttpResponse, ServiceError> {
    let team_id = path.into_inner();

    info!("✏️ Updating team: {}", team_id);

    let team = {
        let _guard = state.store.exclusive()?;

        let mut team = team_storage::find_team_by_id(&state.store, &team_id)?
            .ok_or_else(|| ServiceError::not_found("Team not found"))?;

        if let Some(name) = non_empty(&team_data.name) {
            if let Some(other) = team_storage::find_team_by_name(&state.store, name)? {
                if other.id != team.id {
                    error!("❌ Team name already taken: {}", name);
                    return Err(ServiceError::bad_request("Team name already exists"));
                }
            }
            team.name = name.to_string();
        }
        if let Some(description) = non_empty(&team_data.description) {
            team.description = Some(description.to_string());
        }

        team.updated_at = Utc::now();
        team_storage::save_team(&state.store, &team)?;
        team
    };

    info!("✅ Team updated: {}", team.id);

    Ok(HttpResponse::Ok().json(team))
}

// Delete a team; its members stay but leave the team
#[delete("/teams/{team_id}")]
async fn delete_team(
    state: web::Data<AppState>,
    _admin: Superadmin,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let team_id = path.into_inner();

    info!("🗑️ Deleting team: {}", team_id);

    if !team_storage::delete_team(&state.store, &team_id)? {
        error!("❌ Team not found: {}", team_id);
        return Err(ServiceError::not_found("Team not found"));
    }

    info!("✅ Team deleted successfully: {}", team_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Team deleted" })))
}

// Register all team routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_teams)
        .service(create_team)
        .service(update_team)
        .service(delete_team);
}
