mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use serde_json::json;

use school_portal::models::ErrorCode;
use school_portal::models::users::entities::UserRole;

#[actix_web::test]
async fn offline_recipient_gets_unread_notification() {
    let ctx = common::setup().await;
    let teacher = common::seed_user(&ctx, "ms.novak", UserRole::Teacher).await;
    let student = common::seed_user(&ctx, "eli", UserRole::Student).await;
    let app = portal_app!(ctx);

    assert!(!ctx.hub.is_online(teacher.id));

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/messages")
            .insert_header(common::bearer(&student))
            .set_json(json!({
                "recipient_id": teacher.id,
                "subject": "Question about the lab",
                "content": "Is question 4 due Friday?"
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let message_id = body["data"]["id"].as_i64().expect("message id");
    assert_eq!(body["data"]["is_read"], false);

    let (status, body) = send!(
        app,
        TestRequest::get()
            .uri("/api/v1/notifications/unread-count")
            .insert_header(common::bearer(&teacher))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["unread_count"], 1);

    let (_, body) = send!(
        app,
        TestRequest::get()
            .uri("/api/v1/notifications?unread_only=true")
            .insert_header(common::bearer(&teacher))
    );
    let notification = &body["data"]["items"][0];
    assert_eq!(notification["notification_type"], "message");
    assert_eq!(notification["reference_id"], message_id);
    let notification_id = notification["id"].as_i64().expect("notification id");

    let (_, body) = send!(
        app,
        TestRequest::get()
            .uri("/api/v1/messages/inbox?unread_only=true")
            .insert_header(common::bearer(&teacher))
    );
    assert_eq!(body["data"]["items"][0]["id"], message_id);

    // 只有收件人可以标记已读
    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/v1/messages/{message_id}/read"))
            .insert_header(common::bearer(&student))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/v1/messages/{message_id}/read"))
            .insert_header(common::bearer(&teacher))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_read"], true);

    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/v1/notifications/{notification_id}/read"))
            .insert_header(common::bearer(&teacher))
    );
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send!(
        app,
        TestRequest::get()
            .uri("/api/v1/notifications/unread-count")
            .insert_header(common::bearer(&teacher))
    );
    assert_eq!(body["data"]["unread_count"], 0);

    let (_, body) = send!(
        app,
        TestRequest::get()
            .uri("/api/v1/messages/outbox")
            .insert_header(common::bearer(&student))
    );
    assert_eq!(body["data"]["items"][0]["id"], message_id);
}

#[actix_web::test]
async fn invalid_recipients_are_rejected() {
    let ctx = common::setup().await;
    let student = common::seed_user(&ctx, "fay", UserRole::Student).await;
    let app = portal_app!(ctx);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/messages")
            .insert_header(common::bearer(&student))
            .set_json(json!({
                "recipient_id": student.id,
                "subject": "Note",
                "content": "to self"
            }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::MessageRecipientInvalid as i32);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/messages")
            .insert_header(common::bearer(&student))
            .set_json(json!({
                "recipient_id": 4242,
                "subject": "Hello",
                "content": "anyone?"
            }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::MessageRecipientInvalid as i32);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/messages")
            .insert_header(common::bearer(&student))
            .set_json(json!({
                "recipient_id": 4242,
                "subject": "   ",
                "content": "blank subject"
            }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::BadRequest as i32);
}
