use actix_web::{HttpRequest, HttpResponse};

use super::NotificationService;
use crate::models::ApiResponse;
use crate::models::notifications::responses::UnreadCountResponse;
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn get_unread_count(service: &NotificationService, request: &HttpRequest) -> ServiceResult {
    let actor = current_actor(request)?;
    let unread_count = service
        .get_storage(request)
        .get_unread_notification_count(actor.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UnreadCountResponse { unread_count },
        "Unread count retrieved successfully",
    )))
}
