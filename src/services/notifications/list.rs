use actix_web::{HttpRequest, HttpResponse};

use super::NotificationService;
use crate::models::{ApiResponse, notifications::requests::NotificationListQuery};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn list_notifications(
    service: &NotificationService,
    query: NotificationListQuery,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let response = service
        .get_storage(request)
        .list_user_notifications_with_pagination(actor.user_id, query)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Notification list retrieved successfully",
    )))
}
