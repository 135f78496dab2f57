mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;

use school_portal::models::relay::events::{ClientEvent, ServerEvent};
use school_portal::models::users::entities::UserRole;
use school_portal::services::relay::{SessionContext, session};
use school_portal::storage::Storage;

fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn announcement_ids(events: &[ServerEvent]) -> Vec<i64> {
    events
        .iter()
        .filter_map(|e| match e {
            ServerEvent::NewAnnouncement(a) => Some(a.id),
            _ => None,
        })
        .collect()
}

#[actix_web::test]
async fn class_announcement_reaches_only_the_roster() {
    let ctx = common::setup().await;
    let teacher = common::seed_user(&ctx, "ms.park", UserRole::Teacher).await;
    let enrolled = common::seed_user(&ctx, "gus", UserRole::Student).await;
    let outsider = common::seed_user(&ctx, "hana", UserRole::Student).await;
    let app = portal_app!(ctx);

    let (_, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "name": "History", "capacity": 25 }))
    );
    let class_id = body["data"]["id"].as_i64().expect("class id");

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/enrollments")
            .insert_header(common::bearer(&enrolled))
            .set_json(json!({ "class_id": class_id }))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (teacher_conn, mut teacher_rx) = ctx.hub.connect();
    let (enrolled_conn, mut enrolled_rx) = ctx.hub.connect();
    let (outsider_conn, mut outsider_rx) = ctx.hub.connect();
    ctx.hub.authenticate(teacher_conn, teacher.id, teacher.role);
    ctx.hub.authenticate(enrolled_conn, enrolled.id, enrolled.role);
    ctx.hub.authenticate(outsider_conn, outsider.id, outsider.role);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/announcements")
            .insert_header(common::bearer(&teacher))
            .set_json(json!({
                "title": "Museum trip",
                "content": "Permission slips due Monday",
                "target_audience": "class",
                "target_class_id": class_id
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let announcement_id = body["data"]["id"].as_i64().expect("announcement id");

    let enrolled_events = drain(&mut enrolled_rx);
    assert_eq!(announcement_ids(&enrolled_events), vec![announcement_id]);
    assert!(
        enrolled_events
            .iter()
            .any(|e| matches!(e, ServerEvent::NewNotification(n) if n.reference_id == Some(announcement_id)))
    );

    // 作者收到实时公告，但不产生通知
    let teacher_events = drain(&mut teacher_rx);
    assert_eq!(announcement_ids(&teacher_events), vec![announcement_id]);
    assert!(
        !teacher_events
            .iter()
            .any(|e| matches!(e, ServerEvent::NewNotification(_)))
    );

    assert!(drain(&mut outsider_rx).is_empty());

    // 受众之外的学生看不到该公告
    let (status, _) = send!(
        app,
        TestRequest::get()
            .uri(&format!("/api/v1/announcements/{announcement_id}"))
            .insert_header(common::bearer(&outsider))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send!(
        app,
        TestRequest::get()
            .uri("/api/v1/announcements")
            .insert_header(common::bearer(&enrolled))
    );
    assert_eq!(body["data"]["items"][0]["id"], announcement_id);

    let (status, _) = send!(
        app,
        TestRequest::delete()
            .uri(&format!("/api/v1/announcements/{announcement_id}"))
            .insert_header(common::bearer(&teacher))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(
        drain(&mut enrolled_rx)
            .iter()
            .any(|e| matches!(e, ServerEvent::AnnouncementDeleted { id } if *id == announcement_id))
    );
    assert!(drain(&mut outsider_rx).is_empty());
}

#[actix_web::test]
async fn role_announcement_update_reaches_old_and_new_audience() {
    let ctx = common::setup().await;
    let admin = common::seed_user(&ctx, "principal", UserRole::Admin).await;
    let teacher = common::seed_user(&ctx, "mr.roth", UserRole::Teacher).await;
    let student = common::seed_user(&ctx, "ivy", UserRole::Student).await;
    let app = portal_app!(ctx);

    let (teacher_conn, mut teacher_rx) = ctx.hub.connect();
    let (student_conn, mut student_rx) = ctx.hub.connect();
    ctx.hub.authenticate(teacher_conn, teacher.id, teacher.role);
    ctx.hub.authenticate(student_conn, student.id, student.role);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/announcements")
            .insert_header(common::bearer(&admin))
            .set_json(json!({
                "title": "Staff meeting",
                "content": "Room 12 at 4pm",
                "target_audience": "role",
                "target_role": "teacher",
                "priority": "high"
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let announcement_id = body["data"]["id"].as_i64().expect("announcement id");

    assert_eq!(announcement_ids(&drain(&mut teacher_rx)), vec![announcement_id]);
    assert!(drain(&mut student_rx).is_empty());

    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/v1/announcements/{announcement_id}"))
            .insert_header(common::bearer(&admin))
            .set_json(json!({ "target_role": "student" }))
    );
    assert_eq!(status, StatusCode::OK);

    let updated = |events: Vec<ServerEvent>| {
        events
            .iter()
            .any(|e| matches!(e, ServerEvent::AnnouncementUpdated(a) if a.id == announcement_id))
    };
    assert!(updated(drain(&mut teacher_rx)));
    assert!(updated(drain(&mut student_rx)));

    // 断开后不再收到推送
    ctx.hub.disconnect(student_conn);
    assert!(!ctx.hub.is_online(student.id));
}

#[actix_web::test]
async fn rest_message_is_pushed_to_online_recipient() {
    let ctx = common::setup().await;
    let sender = common::seed_user(&ctx, "jo", UserRole::Student).await;
    let recipient = common::seed_user(&ctx, "ms.quinn", UserRole::Teacher).await;
    let app = portal_app!(ctx);

    let (conn, mut rx) = ctx.hub.connect();
    ctx.hub.authenticate(conn, recipient.id, recipient.role);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/messages")
            .insert_header(common::bearer(&sender))
            .set_json(json!({
                "recipient_id": recipient.id,
                "subject": "Absence",
                "content": "I will miss class tomorrow"
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let message_id = body["data"]["id"].as_i64().expect("message id");

    let events = drain(&mut rx);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, ServerEvent::NewMessage(m) if m.id == message_id))
    );
    assert!(
        events
            .iter()
            .any(|e| matches!(e, ServerEvent::NewNotification(n) if n.reference_id == Some(message_id)))
    );
}

fn session_context(ctx: &common::TestContext) -> SessionContext {
    SessionContext {
        hub: ctx.hub.clone(),
        storage: ctx.storage.clone(),
        cache: Some(ctx.cache.clone()),
    }
}

fn private_message(recipient_id: i64, content: &str, ack_id: &str) -> ClientEvent {
    ClientEvent::PrivateMessage {
        recipient_id,
        subject: "Lab partners".to_string(),
        content: content.to_string(),
        ack_id: Some(ack_id.to_string()),
    }
}

fn error_messages(events: &[ServerEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            ServerEvent::Error { message } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

#[actix_web::test]
async fn session_requires_authentication_and_allows_retry() {
    let ctx = common::setup().await;
    let student = common::seed_user(&ctx, "lena", UserRole::Student).await;
    let classmate = common::seed_user(&ctx, "omar", UserRole::Student).await;
    let session = session_context(&ctx);
    let (conn, mut rx) = ctx.hub.connect();

    session::handle_event(&session, conn, private_message(classmate.id, "Hi", "a0")).await;
    assert_eq!(error_messages(&drain(&mut rx)), vec!["Not authenticated".to_string()]);

    session::handle_event(
        &session,
        conn,
        ClientEvent::Authenticate {
            token: "not-a-token".to_string(),
        },
    )
    .await;
    assert_eq!(error_messages(&drain(&mut rx)).len(), 1);
    assert!(ctx.hub.identity(conn).is_none());

    session::handle_event(
        &session,
        conn,
        ClientEvent::Authenticate {
            token: common::access_token(&student),
        },
    )
    .await;
    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(
        e,
        ServerEvent::Authenticated { user_id, role } if *user_id == student.id && *role == UserRole::Student
    )));
    assert_eq!(ctx.hub.identity(conn), Some((student.id, UserRole::Student)));

    session::handle_event(&session, conn, ClientEvent::Ping).await;
    assert!(matches!(drain(&mut rx).as_slice(), [ServerEvent::Pong]));
}

#[actix_web::test]
async fn session_private_message_is_acknowledged() {
    let ctx = common::setup().await;
    let sender = common::seed_user(&ctx, "theo", UserRole::Student).await;
    let recipient = common::seed_user(&ctx, "mr.ames", UserRole::Teacher).await;
    let session = session_context(&ctx);

    let (sender_conn, mut sender_rx) = ctx.hub.connect();
    let (recipient_conn, mut recipient_rx) = ctx.hub.connect();
    ctx.hub.authenticate(sender_conn, sender.id, sender.role);
    ctx.hub.authenticate(recipient_conn, recipient.id, recipient.role);

    session::handle_event(
        &session,
        sender_conn,
        private_message(recipient.id, "Can we switch partners?", "a1"),
    )
    .await;

    let message_id = match drain(&mut sender_rx).as_slice() {
        [ServerEvent::MessageAck {
            ack_id,
            success: true,
            message_id: Some(id),
            error: None,
        }] => {
            assert_eq!(ack_id.as_deref(), Some("a1"));
            *id
        }
        other => panic!("unexpected sender events: {other:?}"),
    };

    let stored = ctx
        .storage
        .get_message_by_id(message_id)
        .await
        .expect("query message")
        .expect("message persisted");
    assert_eq!(stored.sender_id, sender.id);
    assert_eq!(stored.recipient_id, recipient.id);

    let events = drain(&mut recipient_rx);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, ServerEvent::NewMessage(m) if m.id == message_id))
    );
    assert!(
        events
            .iter()
            .any(|e| matches!(e, ServerEvent::NewNotification(n) if n.reference_id == Some(message_id)))
    );

    // 校验失败：ack 报告失败原因，且不推送给任何人
    session::handle_event(&session, sender_conn, private_message(sender.id, "Note to self", "a2"))
        .await;
    match drain(&mut sender_rx).as_slice() {
        [ServerEvent::MessageAck {
            ack_id,
            success: false,
            message_id: None,
            error: Some(reason),
        }] => {
            assert_eq!(ack_id.as_deref(), Some("a2"));
            assert!(reason.contains("yourself"));
        }
        other => panic!("unexpected sender events: {other:?}"),
    }
    assert!(drain(&mut recipient_rx).is_empty());
}

#[actix_web::test]
async fn failed_reauthentication_clears_identity() {
    let ctx = common::setup().await;
    let student = common::seed_user(&ctx, "alice", UserRole::Student).await;
    let teacher = common::seed_user(&ctx, "ms.bell", UserRole::Teacher).await;
    let session = session_context(&ctx);
    let (conn, mut rx) = ctx.hub.connect();

    session::handle_event(
        &session,
        conn,
        ClientEvent::Authenticate {
            token: common::access_token(&student),
        },
    )
    .await;
    assert!(ctx.hub.is_online(student.id));
    drain(&mut rx);

    session::handle_event(
        &session,
        conn,
        ClientEvent::Authenticate {
            token: "garbage".to_string(),
        },
    )
    .await;
    assert_eq!(error_messages(&drain(&mut rx)).len(), 1);
    assert!(ctx.hub.identity(conn).is_none());
    assert!(!ctx.hub.is_online(student.id));

    session::handle_event(&session, conn, private_message(teacher.id, "Hello", "a3")).await;
    assert_eq!(error_messages(&drain(&mut rx)), vec!["Not authenticated".to_string()]);
    assert_eq!(ctx.hub.connection_count(), 1);
}
