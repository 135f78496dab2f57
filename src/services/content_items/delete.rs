use actix_web::{HttpRequest, HttpResponse};

use super::{ContentItemService, load_item};
use crate::models::ApiResponse;
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn delete_item(
    service: &ContentItemService,
    item_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let item = load_item(&storage, item_id).await?;
    policy::authorize(&actor, Resource::ContentItem(&item), Action::Delete)?;

    storage.delete_content_item(item_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Content item deleted successfully",
    )))
}
