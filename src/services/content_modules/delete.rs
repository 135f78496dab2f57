use actix_web::{HttpRequest, HttpResponse};

use super::{ContentModuleService, load_module};
use crate::models::ApiResponse;
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn delete_module(
    service: &ContentModuleService,
    module_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let (_, class) = load_module(&storage, module_id).await?;
    policy::authorize(&actor, Resource::ContentModule { class: &class }, Action::Delete)?;

    storage.delete_content_module(module_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Content module deleted successfully",
    )))
}
