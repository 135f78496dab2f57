use actix_web::{HttpRequest, HttpResponse};

use super::{ContentItemService, normalize_tags, validate_body, validate_title};
use crate::models::{ApiResponse, content_items::requests::CreateContentItemRequest};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, classes::load_class, current_actor};

pub(crate) async fn create_item(
    service: &ContentItemService,
    mut item_data: CreateContentItemRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);

    let class = match item_data.class_id {
        Some(class_id) => Some(load_class(&storage, class_id).await?),
        None => None,
    };
    policy::authorize(
        &actor,
        Resource::NewContentItem {
            class: class.as_ref(),
        },
        Action::Create,
    )?;

    validate_title(&item_data.title)?;
    validate_body(&item_data.content)?;
    item_data.title = item_data.title.trim().to_string();
    item_data.tags = normalize_tags(item_data.tags)?;

    let item = storage.create_content_item(actor.user_id, item_data).await?;
    tracing::info!("Content item {} created by user {}", item.id, actor.user_id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        item,
        "Content item created successfully",
    )))
}
