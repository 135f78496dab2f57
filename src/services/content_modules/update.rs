use actix_web::{HttpRequest, HttpResponse};

use super::{ContentModuleService, load_module, module_not_found};
use crate::errors::PortalError;
use crate::models::{ApiResponse, ErrorCode, content_modules::requests::UpdateContentModuleRequest};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, WithErrorCode, current_actor};
use crate::utils::validate::validate_required_text;

pub(crate) async fn update_module(
    service: &ContentModuleService,
    module_id: i64,
    mut update_data: UpdateContentModuleRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let (_, class) = load_module(&storage, module_id).await?;
    policy::authorize(&actor, Resource::ContentModule { class: &class }, Action::Update)?;

    if let Some(title) = update_data.title.take() {
        validate_required_text("title", &title, 200).map_err(PortalError::validation)?;
        update_data.title = Some(title.trim().to_string());
    }

    let module = storage
        .update_content_module(module_id, update_data)
        .await
        .with_code(ErrorCode::ContentModuleItemInvalid)?
        .ok_or_else(|| module_not_found(module_id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        module,
        "Content module updated successfully",
    )))
}
