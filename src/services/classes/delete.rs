use actix_web::{HttpRequest, HttpResponse};

use super::{ClassService, load_class};
use crate::models::ApiResponse;
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn delete_class(
    service: &ClassService,
    class_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let class = load_class(&storage, class_id).await?;
    policy::authorize(&actor, Resource::Class(&class), Action::Delete)?;

    storage.delete_class(class_id).await?;
    tracing::info!("Class {} deleted by user {}", class_id, actor.user_id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
}
