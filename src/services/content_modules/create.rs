use actix_web::{HttpRequest, HttpResponse};

use super::{ContentModuleService, ensure_items_usable};
use crate::errors::PortalError;
use crate::models::{ApiResponse, ErrorCode, content_modules::requests::CreateContentModuleRequest};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, WithErrorCode, classes::load_class, current_actor};
use crate::utils::validate::validate_required_text;

pub(crate) async fn create_module(
    service: &ContentModuleService,
    mut module_data: CreateContentModuleRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);

    let class = load_class(&storage, module_data.class_id).await?;
    policy::authorize(&actor, Resource::ContentModule { class: &class }, Action::Create)?;

    validate_required_text("title", &module_data.title, 200).map_err(PortalError::validation)?;
    module_data.title = module_data.title.trim().to_string();
    ensure_items_usable(&storage, class.id, &module_data.items).await?;

    let module = storage
        .create_content_module(actor.user_id, module_data)
        .await
        .with_code(ErrorCode::ContentModuleItemInvalid)?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        module,
        "Content module created successfully",
    )))
}
