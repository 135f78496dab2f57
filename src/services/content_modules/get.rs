use actix_web::{HttpRequest, HttpResponse};

use super::{ContentModuleService, load_module};
use crate::models::{
    ApiResponse,
    content_modules::requests::{ContentModuleListQuery, ContentModuleQueryParams},
};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn list_modules(
    service: &ContentModuleService,
    query: ContentModuleQueryParams,
    request: &HttpRequest,
) -> ServiceResult {
    current_actor(request)?;

    let response = service
        .get_storage(request)
        .list_content_modules_with_pagination(ContentModuleListQuery::from(query))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Content module list retrieved successfully",
    )))
}

pub(crate) async fn get_module(
    service: &ContentModuleService,
    module_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let (module, class) = load_module(&service.get_storage(request), module_id).await?;
    policy::authorize(&actor, Resource::ContentModule { class: &class }, Action::Read)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        module,
        "Content module retrieved successfully",
    )))
}
