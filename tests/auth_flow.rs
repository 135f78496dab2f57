mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use serde_json::json;

use school_portal::models::ErrorCode;

#[actix_web::test]
async fn register_then_login_returns_chosen_role() {
    let ctx = common::setup().await;
    let app = portal_app!(ctx);

    let (status, body) = send!(
        app,
        TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "username": "ms.rivera",
            "email": "Rivera@School.edu",
            "password": common::PASSWORD,
            "role": "teacher"
        }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["role"], "teacher");
    assert_eq!(body["data"]["user"]["email"], "rivera@school.edu");

    let (status, body) = send!(
        app,
        TestRequest::post().uri("/api/v1/auth/login").set_json(json!({
            "username": "ms.rivera",
            "password": common::PASSWORD
        }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["role"], "teacher");
    let token = body["data"]["access_token"]
        .as_str()
        .expect("access token")
        .to_string();

    let (status, body) = send!(
        app,
        TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], "ms.rivera");
}

#[actix_web::test]
async fn register_defaults_to_student_and_rejects_admin() {
    let ctx = common::setup().await;
    let app = portal_app!(ctx);

    let (status, body) = send!(
        app,
        TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "username": "sam",
            "email": "sam@school.edu",
            "password": common::PASSWORD
        }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["role"], "student");

    let (status, _) = send!(
        app,
        TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "username": "mallory",
            "email": "mallory@school.edu",
            "password": common::PASSWORD,
            "role": "admin"
        }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "username": "sam",
            "email": "other@school.edu",
            "password": common::PASSWORD
        }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], ErrorCode::UserNameAlreadyExists as i32);
}

#[actix_web::test]
async fn bad_credentials_and_missing_token_are_unauthorized() {
    let ctx = common::setup().await;
    common::seed_user(&ctx, "kim", school_portal::models::users::entities::UserRole::Student)
        .await;
    let app = portal_app!(ctx);

    let (status, body) = send!(
        app,
        TestRequest::post().uri("/api/v1/auth/login").set_json(json!({
            "username": "kim",
            "password": "wrong-password-1"
        }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], ErrorCode::AuthFailed as i32);

    let (status, _) = send!(app, TestRequest::get().uri("/api/v1/classes"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
