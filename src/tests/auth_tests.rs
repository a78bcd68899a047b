use super::{bearer, TestContext, TEST_PASSWORD};
use crate::models::{User, DEFAULT_AVATAR_URL};
use crate::utils::user_storage;
use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

#[actix_rt::test]
async fn health_needs_no_token() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "Content Planner API is running");
}

#[actix_rt::test]
async fn register_issues_token_and_hides_password() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": "maya", "email": "maya@content.com", "password": "pw123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "maya");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["token"].as_str().map_or(false, |t| !t.is_empty()));
}

#[actix_rt::test]
async fn duplicate_registration_is_rejected() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let register = |username: &str, email: &str| {
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "username": username, "email": email, "password": "pw123456" }))
            .to_request()
    };

    let first = test::call_service(&app, register("maya", "maya@content.com")).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let same_name = test::call_service(&app, register("maya", "other@content.com")).await;
    assert_eq!(same_name.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(same_name).await;
    assert_eq!(body["error"], "Username or email already exists");

    let same_email = test::call_service(&app, register("maya2", "MAYA@content.com")).await;
    assert_eq!(same_email.status(), StatusCode::BAD_REQUEST);

    // admin plus the single registered user
    assert_eq!(ctx.state.store.list::<User>().unwrap().len(), 2);
}

#[actix_rt::test]
async fn register_requires_all_fields() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": "maya", "password": "pw123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn login_with_default_admin() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "admin", "password": "admin123" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["role"], "superadmin");
    assert_eq!(body["user"]["email"], "admin@content.com");

    let token = body["token"].as_str().unwrap();
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(token))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["user"]["username"], "admin");
}

#[actix_rt::test]
async fn bad_credentials_are_unauthorized() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    for (username, password) in [("admin", "wrong"), ("nobody", "admin123")] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid credentials");
    }
}

#[actix_rt::test]
async fn login_with_missing_fields_is_unauthorized() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    for body in [json!({ "username": "admin" }), json!({ "password": "admin123" }), json!({})] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid credentials");
    }
}

#[actix_rt::test]
async fn expired_access_blocks_login() {
    let ctx = TestContext::new();
    let mut user = ctx.add_user("contractor");
    user.active_until = Some(Utc::now() - Duration::days(1));
    user_storage::save_user(&ctx.state.store, &user).unwrap();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "contractor", "password": TEST_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Account access has expired");
}

#[actix_rt::test]
async fn token_checks_on_protected_routes() {
    let ctx = TestContext::new();
    let ghost = ctx.add_user("ghost");
    let ghost_token = ctx.token_for(&ghost);
    ctx.state.store.delete::<User>(&ghost.id).unwrap();
    let app = test_app!(ctx);

    let cases = [
        (None, "Access denied. No token provided."),
        (Some("not-a-jwt".to_string()), "Invalid token."),
        (Some(ghost_token), "User not found."),
    ];

    for (token, message) in cases {
        let mut req = test::TestRequest::get().uri("/api/plans");
        if let Some(token) = &token {
            req = req.insert_header(bearer(token));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], message);
    }
}

#[actix_rt::test]
async fn profile_update_skips_empty_fields() {
    let ctx = TestContext::new();
    let user = ctx.add_user("maya");
    let token = ctx.token_for(&user);
    let app = test_app!(ctx);

    let req = test::TestRequest::put()
        .uri("/api/auth/profile")
        .insert_header(bearer(&token))
        .set_json(json!({ "username": "", "phoneNumber": "+62 812 0000" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["user"]["username"], "maya");
    assert_eq!(body["user"]["phoneNumber"], "+62 812 0000");

    // taken by the admin
    let req = test::TestRequest::put()
        .uri("/api/auth/profile")
        .insert_header(bearer(&token))
        .set_json(json!({ "email": "admin@content.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

fn multipart_body(boundary: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"avatar\"\r\nContent-Type: {ct}\r\n\r\n",
        b = boundary,
        ct = content_type
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

#[actix_rt::test]
async fn avatar_upload_stores_image_and_updates_user() {
    let ctx = TestContext::new();
    let user = ctx.add_user("maya");
    let token = ctx.token_for(&user);
    let app = test_app!(ctx);

    let boundary = "planner-boundary";
    let req = test::TestRequest::post()
        .uri("/api/auth/avatar")
        .insert_header(bearer(&token))
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", boundary),
        ))
        .set_payload(multipart_body(boundary, "image/png", b"\x89PNG fake image"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let avatar_url = body["avatarUrl"].as_str().unwrap();
    assert!(avatar_url.contains("/uploads/avatars/"));
    assert!(avatar_url.ends_with(".png"));
    assert_eq!(body["user"]["avatarUrl"], avatar_url);

    let file_name = avatar_url.rsplit('/').next().unwrap();
    assert!(ctx.dir.path().join("uploads/avatars").join(file_name).exists());
}

#[actix_rt::test]
async fn avatar_upload_rejects_non_images() {
    let ctx = TestContext::new();
    let token = ctx.admin_token();
    let app = test_app!(ctx);

    let boundary = "planner-boundary";
    let svg: &[u8] = b"<svg xmlns=\"http://www.w3.org/2000/svg\"><script>alert(1)</script></svg>";
    for (content_type, bytes) in [("text/plain", &b"hello"[..]), ("image/svg+xml", svg)] {
        let req = test::TestRequest::post()
            .uri("/api/auth/avatar")
            .insert_header(bearer(&token))
            .insert_header((
                "Content-Type",
                format!("multipart/form-data; boundary={}", boundary),
            ))
            .set_payload(multipart_body(boundary, content_type, bytes))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Only image files are allowed!");
    }

    // nothing was written for either upload
    let avatars = ctx.dir.path().join("uploads/avatars");
    assert!(!avatars.exists() || std::fs::read_dir(&avatars).unwrap().next().is_none());
    assert_eq!(ctx.admin().avatar_url, DEFAULT_AVATAR_URL);
}

#[actix_rt::test]
async fn concurrent_registrations_create_one_user() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let register = || {
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "username": "twin", "email": "twin@content.com", "password": "pw123456" }))
            .to_request()
    };

    let (a, b) = tokio::join!(
        test::call_service(&app, register()),
        test::call_service(&app, register())
    );

    let mut statuses = vec![a.status().as_u16(), b.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, vec![201, 400]);
    assert_eq!(ctx.state.store.list::<User>().unwrap().len(), 2);
}
