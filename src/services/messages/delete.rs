use actix_web::{HttpRequest, HttpResponse};

use super::{MessageService, load_message};
use crate::models::ApiResponse;
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn delete_message(
    service: &MessageService,
    message_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let message = load_message(&storage, message_id).await?;
    policy::authorize(&actor, Resource::Message(&message), Action::Delete)?;

    storage.delete_message(message_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Message deleted successfully",
    )))
}
