use actix_web::{HttpRequest, HttpResponse};

use super::{ContentItemService, item_not_found, load_item, normalize_tags, validate_body, validate_title};
use crate::models::{ApiResponse, content_items::requests::UpdateContentItemRequest};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, classes::load_class, current_actor};

pub(crate) async fn update_item(
    service: &ContentItemService,
    item_id: i64,
    mut update_data: UpdateContentItemRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let item = load_item(&storage, item_id).await?;
    policy::authorize(&actor, Resource::ContentItem(&item), Action::Update)?;

    // 移动到其他班级时需要是目标班级的教师
    if let Some(class_id) = update_data.class_id
        && item.class_id != Some(class_id)
    {
        let class = load_class(&storage, class_id).await?;
        policy::authorize(
            &actor,
            Resource::NewContentItem { class: Some(&class) },
            Action::Create,
        )?;
    }

    if let Some(title) = update_data.title.take() {
        validate_title(&title)?;
        update_data.title = Some(title.trim().to_string());
    }
    if let Some(content) = &update_data.content {
        validate_body(content)?;
    }
    if let Some(tags) = update_data.tags.take() {
        update_data.tags = Some(normalize_tags(tags)?);
    }

    let item = storage
        .update_content_item(item_id, actor.user_id, update_data)
        .await?
        .ok_or_else(|| item_not_found(item_id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        item,
        "Content item updated successfully",
    )))
}
