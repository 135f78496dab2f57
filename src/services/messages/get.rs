use actix_web::{HttpRequest, HttpResponse};

use super::{MessageService, load_message, message_not_found};
use crate::models::ApiResponse;
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn get_message(
    service: &MessageService,
    message_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let message = load_message(&service.get_storage(request), message_id).await?;
    policy::authorize(&actor, Resource::Message(&message), Action::Read)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        message,
        "Message retrieved successfully",
    )))
}

/// 收件人标记已读；重复标记保留首次 read_at
pub(crate) async fn mark_read(
    service: &MessageService,
    message_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let message = load_message(&storage, message_id).await?;
    policy::authorize(&actor, Resource::Message(&message), Action::Update)?;

    let message = if message.is_read {
        message
    } else {
        storage
            .mark_message_read(message_id)
            .await?
            .ok_or_else(|| message_not_found(message_id))?
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(message, "Message marked as read")))
}
