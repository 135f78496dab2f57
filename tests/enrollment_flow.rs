mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use chrono::{Days, NaiveDate};
use futures_util::future::join_all;
use serde_json::json;

use school_portal::errors::PortalError;
use school_portal::models::ErrorCode;
use school_portal::models::classes::requests::CreateClassRequest;
use school_portal::models::enrollments::entities::{AttendanceEntry, AttendanceStatus};
use school_portal::models::users::entities::UserRole;
use school_portal::storage::Storage;

#[actix_web::test]
async fn capacity_counter_and_re_enrollment() {
    let ctx = common::setup().await;
    let teacher = common::seed_user(&ctx, "mr.okafor", UserRole::Teacher).await;
    let ana = common::seed_user(&ctx, "ana", UserRole::Student).await;
    let ben = common::seed_user(&ctx, "ben", UserRole::Student).await;
    let app = portal_app!(ctx);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "name": "Chemistry", "capacity": 1 }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let class_id = body["data"]["id"].as_i64().expect("class id");
    assert_eq!(body["data"]["teacher_id"], teacher.id);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/enrollments")
            .insert_header(common::bearer(&ana))
            .set_json(json!({ "class_id": class_id }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let ana_enrollment = body["data"]["id"].as_i64().expect("enrollment id");

    // 已满员
    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/enrollments")
            .insert_header(common::bearer(&ben))
            .set_json(json!({ "class_id": class_id }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], ErrorCode::ClassFull as i32);

    let class = ctx
        .storage
        .get_class_by_id(class_id)
        .await
        .expect("query")
        .expect("class");
    assert_eq!(class.enrollment_count, 1);

    // 学生不能自行结课
    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/v1/enrollments/{ana_enrollment}"))
            .insert_header(common::bearer(&ana))
            .set_json(json!({ "status": "completed" }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/v1/enrollments/{ana_enrollment}"))
            .insert_header(common::bearer(&ana))
            .set_json(json!({ "status": "dropped" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "dropped");

    let class = ctx
        .storage
        .get_class_by_id(class_id)
        .await
        .expect("query")
        .expect("class");
    assert_eq!(class.enrollment_count, 0);

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/enrollments")
            .insert_header(common::bearer(&ben))
            .set_json(json!({ "class_id": class_id }))
    );
    assert_eq!(status, StatusCode::CREATED);

    // 退课后重新选课，但名额已被占用
    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/enrollments")
            .insert_header(common::bearer(&ana))
            .set_json(json!({ "class_id": class_id }))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/v1/classes/{class_id}"))
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "capacity": 2 }))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/enrollments")
            .insert_header(common::bearer(&ana))
            .set_json(json!({ "class_id": class_id }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"].as_i64(), Some(ana_enrollment));
    assert_eq!(body["data"]["status"], "active");

    let class = ctx
        .storage
        .get_class_by_id(class_id)
        .await
        .expect("query")
        .expect("class");
    assert_eq!(class.enrollment_count, 2);

    // 容量不能低于当前人数
    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/v1/classes/{class_id}"))
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "capacity": 1 }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn duplicate_enrollment_and_roster_visibility() {
    let ctx = common::setup().await;
    let teacher = common::seed_user(&ctx, "ms.lee", UserRole::Teacher).await;
    let other_teacher = common::seed_user(&ctx, "mr.diaz", UserRole::Teacher).await;
    let student = common::seed_user(&ctx, "chen", UserRole::Student).await;
    let app = portal_app!(ctx);

    let (_, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "name": "Biology", "capacity": 30 }))
    );
    let class_id = body["data"]["id"].as_i64().expect("class id");

    // 教师为学生选课
    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/enrollments")
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "class_id": class_id, "student_id": student.id }))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/enrollments")
            .insert_header(common::bearer(&student))
            .set_json(json!({ "class_id": class_id }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], ErrorCode::EnrollmentAlreadyActive as i32);

    let (status, body) = send!(
        app,
        TestRequest::get()
            .uri(&format!("/api/v1/classes/{class_id}/roster"))
            .insert_header(common::bearer(&teacher))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["students"][0]["username"], "chen");

    let (status, _) = send!(
        app,
        TestRequest::get()
            .uri(&format!("/api/v1/classes/{class_id}/roster"))
            .insert_header(common::bearer(&other_teacher))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}

async fn seed_class(ctx: &common::TestContext, teacher_id: i64, capacity: i32) -> i64 {
    ctx.storage
        .create_class(
            teacher_id,
            CreateClassRequest {
                teacher_id: None,
                name: "Robotics".to_string(),
                description: None,
                subject: Some("engineering".to_string()),
                capacity,
                schedule: None,
                start_date: None,
                end_date: None,
            },
        )
        .await
        .expect("create class")
        .id
}

#[actix_web::test]
async fn concurrent_attendance_appends_are_all_kept() {
    let ctx = common::setup().await;
    let teacher = common::seed_user(&ctx, "ms.diaz", UserRole::Teacher).await;
    let student = common::seed_user(&ctx, "kai", UserRole::Student).await;
    let class_id = seed_class(&ctx, teacher.id, 10).await;
    let enrollment = ctx
        .storage
        .enroll_student(class_id, student.id)
        .await
        .expect("enroll");

    let start = NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date");
    let appends = (0..8u64).map(|day| {
        ctx.storage.record_attendance(
            enrollment.id,
            AttendanceEntry {
                date: start + Days::new(day),
                status: AttendanceStatus::Present,
                note: None,
                recorded_by: teacher.id,
                recorded_at: chrono::Utc::now(),
            },
        )
    });
    let results = join_all(appends).await;
    assert!(results.iter().all(|r| matches!(r, Ok(Some(_)))));

    let stored = ctx
        .storage
        .get_enrollment_by_id(enrollment.id)
        .await
        .expect("query enrollment")
        .expect("enrollment exists");
    assert_eq!(stored.attendance.len(), 8);

    let mut dates: Vec<_> = stored.attendance.iter().map(|a| a.date).collect();
    dates.sort();
    dates.dedup();
    assert_eq!(dates.len(), 8);
}

#[actix_web::test]
async fn concurrent_enrollments_never_exceed_capacity() {
    let ctx = common::setup().await;
    let teacher = common::seed_user(&ctx, "mr.lund", UserRole::Teacher).await;
    let class_id = seed_class(&ctx, teacher.id, 1).await;

    let mut students = Vec::new();
    for i in 0..6 {
        students.push(common::seed_user(&ctx, &format!("pupil{i}"), UserRole::Student).await);
    }

    let results = join_all(
        students
            .iter()
            .map(|s| ctx.storage.enroll_student(class_id, s.id)),
    )
    .await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, PortalError::ClassFull(_)))
    );

    let class = ctx
        .storage
        .get_class_by_id(class_id)
        .await
        .expect("query class")
        .expect("class exists");
    assert_eq!(class.enrollment_count, 1);
}
