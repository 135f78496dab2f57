use actix_web::{HttpRequest, HttpResponse};

use super::{ContentModuleService, ensure_items_usable, load_module, module_not_found};
use crate::models::{ApiResponse, ErrorCode, content_modules::requests::AddModuleItemRequest};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, WithErrorCode, current_actor};

pub(crate) async fn add_item(
    service: &ContentModuleService,
    module_id: i64,
    item_data: AddModuleItemRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let (_, class) = load_module(&storage, module_id).await?;
    policy::authorize(&actor, Resource::ContentModule { class: &class }, Action::Update)?;

    ensure_items_usable(&storage, class.id, &[item_data.content_item_id]).await?;

    // 重复添加返回 409
    let module = storage
        .add_content_module_item(module_id, item_data.content_item_id, item_data.position)
        .await
        .with_code(ErrorCode::ContentModuleItemInvalid)?
        .ok_or_else(|| module_not_found(module_id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        module,
        "Content item added to module",
    )))
}

pub(crate) async fn remove_item(
    service: &ContentModuleService,
    module_id: i64,
    item_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let (_, class) = load_module(&storage, module_id).await?;
    policy::authorize(&actor, Resource::ContentModule { class: &class }, Action::Update)?;

    let module = storage
        .remove_content_module_item(module_id, item_id)
        .await
        .with_code(ErrorCode::ContentModuleItemInvalid)?
        .ok_or_else(|| module_not_found(module_id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        module,
        "Content item removed from module",
    )))
}
