use super::{bearer, TestContext};
use crate::models::{ContentPlan, SocialAccount, Team, User};
use crate::utils::user_storage;
use actix_web::http::StatusCode;
use actix_web::test;
use chrono::NaiveDate;
use serde_json::{json, Value};

#[actix_rt::test]
async fn regular_users_cannot_reach_admin_routes() {
    let ctx = TestContext::new();
    let user = ctx.add_user("maya");
    let token = ctx.token_for(&user);
    let app = test_app!(ctx);

    for uri in ["/api/users", "/api/teams"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Access denied. Superadmin only.");
    }
}

#[actix_rt::test]
async fn create_user_with_team_and_list() {
    let ctx = TestContext::new();
    let team = Team::new("Creative Team".into(), None);
    ctx.state.store.save(&team).unwrap();
    let token = ctx.admin_token();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(bearer(&token))
        .set_json(json!({
            "username": "editor",
            "email": "editor@content.com",
            "password": "pw123456",
            "phoneNumber": "+1 555 0100",
            "TeamId": team.id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["role"], "user");
    assert_eq!(body["user"]["Team"]["name"], "Creative Team");
    let user_id = body["user"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let usernames: Vec<_> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(usernames, vec!["admin", "editor"]);

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", user_id))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["phoneNumber"], "+1 555 0100");
}

#[actix_rt::test]
async fn create_user_with_unknown_team_is_rejected() {
    let ctx = TestContext::new();
    let token = ctx.admin_token();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(bearer(&token))
        .set_json(json!({
            "username": "editor",
            "email": "editor@content.com",
            "password": "pw123456",
            "TeamId": uuid::Uuid::new_v4().to_string(),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.state.store.list::<User>().unwrap().len(), 1);
}

#[actix_rt::test]
async fn update_user_is_partial_and_keeps_names_unique() {
    let ctx = TestContext::new();
    let user = ctx.add_user("maya");
    ctx.add_user("rio");
    let token = ctx.admin_token();
    let app = test_app!(ctx);

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{}", user.id))
        .insert_header(bearer(&token))
        .set_json(json!({ "username": "", "role": "superadmin" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["username"], "maya");
    assert_eq!(body["user"]["role"], "superadmin");

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{}", user.id))
        .insert_header(bearer(&token))
        .set_json(json!({ "username": "rio" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let stored = user_storage::find_user_by_id(&ctx.state.store, &user.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.username, "maya");
}

#[actix_rt::test]
async fn superadmin_cannot_delete_self() {
    let ctx = TestContext::new();
    let admin = ctx.admin();
    let token = ctx.token_for(&admin);
    let app = test_app!(ctx);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}", admin.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Cannot delete your own account");
    assert!(user_storage::find_user_by_id(&ctx.state.store, &admin.id)
        .unwrap()
        .is_some());
}

#[actix_rt::test]
async fn deleting_user_keeps_their_content() {
    let ctx = TestContext::new();
    let user = ctx.add_user("maya");
    let account = ctx.add_account("Instagram", "maya_ig", &user);
    let plan = ContentPlan::new(
        "Office Tour".into(),
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        &account.id,
        &user.id,
    );
    ctx.state.store.save(&plan).unwrap();
    let token = ctx.admin_token();
    let app = test_app!(ctx);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}", user.id))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);

    let account: SocialAccount = ctx.state.store.find(&account.id).unwrap().unwrap();
    assert_eq!(account.user_id, None);
    let plan: ContentPlan = ctx.state.store.find(&plan.id).unwrap().unwrap();
    assert_eq!(plan.user_id, None);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}", user.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn team_names_are_unique() {
    let ctx = TestContext::new();
    let token = ctx.admin_token();
    let app = test_app!(ctx);

    let create = |name: &str| {
        test::TestRequest::post()
            .uri("/api/teams")
            .insert_header(bearer(&token))
            .set_json(json!({ "name": name, "description": "Short-form video" }))
            .to_request()
    };

    let resp = test::call_service(&app, create("Video Team")).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let team: Value = test::read_body_json(resp).await;
    assert_eq!(team["description"], "Short-form video");

    let resp = test::call_service(&app, create("Video Team")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Team name already exists");

    // renaming another team onto the same name is refused too
    let resp = test::call_service(&app, create("Photo Team")).await;
    let photo: Value = test::read_body_json(resp).await;
    let req = test::TestRequest::put()
        .uri(&format!("/api/teams/{}", photo["id"].as_str().unwrap()))
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "Video Team" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn deleting_team_detaches_members() {
    let ctx = TestContext::new();
    let team = Team::new("Creative Team".into(), None);
    ctx.state.store.save(&team).unwrap();
    let mut members = Vec::new();
    for name in ["maya", "rio"] {
        let mut user = ctx.add_user(name);
        user.team_id = Some(team.id.clone());
        user_storage::save_user(&ctx.state.store, &user).unwrap();
        members.push(user);
    }
    let token = ctx.admin_token();
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/teams")
        .insert_header(bearer(&token))
        .to_request();
    let teams: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(teams[0]["Users"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/teams/{}", team.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    for member in members {
        let stored = user_storage::find_user_by_id(&ctx.state.store, &member.id)
            .unwrap()
            .expect("member survives team deletion");
        assert_eq!(stored.team_id, None);
    }
    assert!(ctx.state.store.list::<Team>().unwrap().is_empty());
}

#[actix_rt::test]
async fn unknown_ids_are_not_found() {
    let ctx = TestContext::new();
    let token = ctx.admin_token();
    let app = test_app!(ctx);

    for uri in ["/api/users/does-not-exist", "/api/teams/does-not-exist"] {
        let req = test::TestRequest::delete()
            .uri(uri)
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
