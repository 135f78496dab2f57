use actix_web::{HttpRequest, HttpResponse};

use super::MessageService;
use crate::errors::PortalError;
use crate::models::{ApiResponse, ErrorCode, messages::requests::SendMessageRequest};
use crate::services::{ServiceError, ServiceResult, current_actor, hub_from, relay::dispatch};
use crate::utils::validate::validate_required_text;

pub(crate) async fn send_message(
    service: &MessageService,
    message_data: SendMessageRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;

    // 正文校验先行，之后剩下的校验错误都与收件人有关
    validate_required_text("subject", &message_data.subject, 200)
        .map_err(PortalError::validation)?;
    validate_required_text("content", &message_data.content, 10_000)
        .map_err(PortalError::validation)?;

    let storage = service.get_storage(request);
    let hub = hub_from(request);
    let message = dispatch::send_private_message(&storage, &hub, actor.user_id, message_data)
        .await
        .map_err(|e| match e {
            PortalError::Validation(_) => {
                ServiceError::new(ErrorCode::MessageRecipientInvalid, e)
            }
            other => other.into(),
        })?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        message,
        "Message sent successfully",
    )))
}
