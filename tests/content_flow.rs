mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use futures_util::future::join_all;
use serde_json::json;

use school_portal::models::ErrorCode;
use school_portal::models::content_items::entities::ContentType;
use school_portal::models::content_items::requests::{
    CreateContentItemRequest, UpdateContentItemRequest,
};
use school_portal::models::users::entities::UserRole;
use school_portal::storage::Storage;

#[actix_web::test]
async fn content_edits_build_version_history() {
    let ctx = common::setup().await;
    let teacher = common::seed_user(&ctx, "ms.hart", UserRole::Teacher).await;
    let student = common::seed_user(&ctx, "dana", UserRole::Student).await;
    let app = portal_app!(ctx);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/content-items")
            .insert_header(common::bearer(&teacher))
            .set_json(json!({
                "title": "Photosynthesis",
                "content_type": "lesson",
                "content": "v1",
                "tags": ["Biology", "biology", " week-2 "]
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let item_id = body["data"]["id"].as_i64().expect("item id");
    assert_eq!(body["data"]["version"], 1);
    assert_eq!(body["data"]["status"], "draft");
    assert_eq!(body["data"]["tags"], json!(["biology", "week-2"]));

    // 草稿对学生不可见
    let (status, _) = send!(
        app,
        TestRequest::get()
            .uri(&format!("/api/v1/content-items/{item_id}"))
            .insert_header(common::bearer(&student))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    for content in ["v2", "v3"] {
        let (status, _) = send!(
            app,
            TestRequest::put()
                .uri(&format!("/api/v1/content-items/{item_id}"))
                .insert_header(common::bearer(&teacher))
                .set_json(json!({ "content": content }))
        );
        assert_eq!(status, StatusCode::OK);
    }

    // 只改标题不产生新版本
    let (status, body) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/v1/content-items/{item_id}"))
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "title": "Photosynthesis basics", "status": "published" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["version"], 3);
    assert!(body["data"]["published_at"].is_string());

    let (status, body) = send!(
        app,
        TestRequest::get()
            .uri(&format!("/api/v1/content-items/{item_id}/versions"))
            .insert_header(common::bearer(&student))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["current_version"], 3);
    let versions = body["data"]["versions"].as_array().expect("versions");
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["version"], 1);
    assert_eq!(versions[0]["content"], "v1");
    assert_eq!(versions[1]["content"], "v2");
    assert_eq!(versions[1]["edited_by"], teacher.id);

    // 学生不能修改他人内容
    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/v1/content-items/{item_id}"))
            .insert_header(common::bearer(&student))
            .set_json(json!({ "content": "hacked" }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn modules_keep_ordered_unique_items() {
    let ctx = common::setup().await;
    let teacher = common::seed_user(&ctx, "mr.ito", UserRole::Teacher).await;
    let app = portal_app!(ctx);

    let (_, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "name": "Physics", "capacity": 20 }))
    );
    let class_id = body["data"]["id"].as_i64().expect("class id");

    let mut item_ids = Vec::new();
    for title in ["Forces", "Energy"] {
        let (_, body) = send!(
            app,
            TestRequest::post()
                .uri("/api/v1/content-items")
                .insert_header(common::bearer(&teacher))
                .set_json(json!({
                    "title": title,
                    "content_type": "lesson",
                    "content": "notes",
                    "class_id": class_id
                }))
        );
        item_ids.push(body["data"]["id"].as_i64().expect("item id"));
    }

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/content-modules")
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "class_id": class_id, "title": "Unit 1", "items": [item_ids[0]] }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let module_id = body["data"]["id"].as_i64().expect("module id");

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/api/v1/content-modules/{module_id}/items"))
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "content_item_id": item_ids[1], "position": 0 }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([item_ids[1], item_ids[0]]));

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/api/v1/content-modules/{module_id}/items"))
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "content_item_id": item_ids[1] }))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/api/v1/content-modules/{module_id}/items"))
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "content_item_id": 9999 }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::ContentModuleItemInvalid as i32);

    let (status, body) = send!(
        app,
        TestRequest::delete()
            .uri(&format!(
                "/api/v1/content-modules/{module_id}/items/{}",
                item_ids[1]
            ))
            .insert_header(common::bearer(&teacher))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([item_ids[0]]));
}

#[actix_web::test]
async fn concurrent_content_edits_each_add_one_version() {
    let ctx = common::setup().await;
    let teacher = common::seed_user(&ctx, "ms.hale", UserRole::Teacher).await;
    let item = ctx
        .storage
        .create_content_item(
            teacher.id,
            CreateContentItemRequest {
                title: "Photosynthesis".to_string(),
                description: None,
                content_type: ContentType::Lesson,
                content: "v1".to_string(),
                class_id: None,
                status: None,
                tags: Vec::new(),
            },
        )
        .await
        .expect("create item");

    let edits = (0..8).map(|i| {
        ctx.storage.update_content_item(
            item.id,
            teacher.id,
            UpdateContentItemRequest {
                content: Some(format!("rewrite {i}")),
                ..Default::default()
            },
        )
    });
    let results = join_all(edits).await;
    assert!(results.iter().all(|r| matches!(r, Ok(Some(_)))));

    let stored = ctx
        .storage
        .get_content_item_by_id(item.id)
        .await
        .expect("query item")
        .expect("item exists");
    assert_eq!(stored.version, 9);
    assert_eq!(stored.previous_versions.len(), 8);
    let mut versions: Vec<_> = stored.previous_versions.iter().map(|v| v.version).collect();
    versions.sort();
    assert_eq!(versions, (1..=8).collect::<Vec<_>>());

    // 只改标题不影响正文与版本
    let renamed = ctx
        .storage
        .update_content_item(
            item.id,
            teacher.id,
            UpdateContentItemRequest {
                title: Some("Photosynthesis basics".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("rename")
        .expect("item exists");
    assert_eq!(renamed.version, 9);
    assert_eq!(renamed.content, stored.content);
}

#[actix_web::test]
async fn removed_or_moved_items_leave_modules() {
    let ctx = common::setup().await;
    let teacher = common::seed_user(&ctx, "mr.vogel", UserRole::Teacher).await;
    let app = portal_app!(ctx);

    let mut class_ids = Vec::new();
    for name in ["Biology", "Geology"] {
        let (_, body) = send!(
            app,
            TestRequest::post()
                .uri("/api/v1/classes")
                .insert_header(common::bearer(&teacher))
                .set_json(json!({ "name": name, "capacity": 20 }))
        );
        class_ids.push(body["data"]["id"].as_i64().expect("class id"));
    }

    let mut item_ids = Vec::new();
    for title in ["Cells", "Genes", "Evolution"] {
        let (_, body) = send!(
            app,
            TestRequest::post()
                .uri("/api/v1/content-items")
                .insert_header(common::bearer(&teacher))
                .set_json(json!({
                    "title": title,
                    "content_type": "lesson",
                    "content": "notes",
                    "class_id": class_ids[0]
                }))
        );
        item_ids.push(body["data"]["id"].as_i64().expect("item id"));
    }

    let mut module_ids = Vec::new();
    for items in [json!([item_ids[0], item_ids[1]]), json!([item_ids[1], item_ids[2]])] {
        let (status, body) = send!(
            app,
            TestRequest::post()
                .uri("/api/v1/content-modules")
                .insert_header(common::bearer(&teacher))
                .set_json(json!({ "class_id": class_ids[0], "title": "Unit", "items": items }))
        );
        assert_eq!(status, StatusCode::CREATED);
        module_ids.push(body["data"]["id"].as_i64().expect("module id"));
    }

    let (status, _) = send!(
        app,
        TestRequest::delete()
            .uri(&format!("/api/v1/content-items/{}", item_ids[0]))
            .insert_header(common::bearer(&teacher))
    );
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send!(
        app,
        TestRequest::get()
            .uri(&format!("/api/v1/content-modules/{}", module_ids[0]))
            .insert_header(common::bearer(&teacher))
    );
    assert_eq!(body["data"]["items"], json!([item_ids[1]]));

    // 剩余条目即可完成重排
    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/v1/content-modules/{}", module_ids[0]))
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "items": [item_ids[1]] }))
    );
    assert_eq!(status, StatusCode::OK);

    // 迁移到其他班级后从原班级的模块中移除
    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/v1/content-items/{}", item_ids[1]))
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "class_id": class_ids[1] }))
    );
    assert_eq!(status, StatusCode::OK);

    for (module_id, expected) in [(module_ids[0], json!([])), (module_ids[1], json!([item_ids[2]]))] {
        let (_, body) = send!(
            app,
            TestRequest::get()
                .uri(&format!("/api/v1/content-modules/{module_id}"))
                .insert_header(common::bearer(&teacher))
        );
        assert_eq!(body["data"]["items"], expected);
    }
}
