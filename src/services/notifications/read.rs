use actix_web::{HttpRequest, HttpResponse};

use super::{NotificationService, load_notification, notification_not_found};
use crate::models::{ApiResponse, notifications::responses::MarkAllReadResponse};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn mark_as_read(
    service: &NotificationService,
    notification_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let notification = load_notification(&storage, notification_id).await?;
    policy::authorize(&actor, Resource::Notification(&notification), Action::Update)?;

    if !notification.is_read && !storage.mark_notification_read(notification_id).await? {
        return Err(notification_not_found(notification_id));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Notification marked as read",
    )))
}

pub(crate) async fn mark_all_as_read(service: &NotificationService, request: &HttpRequest) -> ServiceResult {
    let actor = current_actor(request)?;
    let marked_count = service
        .get_storage(request)
        .mark_all_notifications_read(actor.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MarkAllReadResponse { marked_count },
        "All notifications marked as read",
    )))
}
