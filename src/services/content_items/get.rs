use actix_web::{HttpRequest, HttpResponse};

use super::{ContentItemService, load_item};
use crate::models::{ApiResponse, content_items::responses::ContentVersionsResponse};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn get_item(
    service: &ContentItemService,
    item_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let item = load_item(&service.get_storage(request), item_id).await?;
    policy::authorize(&actor, Resource::ContentItem(&item), Action::Read)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        item,
        "Content item retrieved successfully",
    )))
}

pub(crate) async fn list_versions(
    service: &ContentItemService,
    item_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let item = load_item(&service.get_storage(request), item_id).await?;
    policy::authorize(&actor, Resource::ContentItem(&item), Action::Read)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ContentVersionsResponse {
            item_id: item.id,
            current_version: item.version,
            versions: item.previous_versions,
        },
        "Content versions retrieved successfully",
    )))
}
