use actix_web::{HttpRequest, HttpResponse};

use super::{NotificationService, load_notification};
use crate::models::ApiResponse;
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn delete_notification(
    service: &NotificationService,
    notification_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let notification = load_notification(&storage, notification_id).await?;
    policy::authorize(&actor, Resource::Notification(&notification), Action::Delete)?;

    storage.delete_notification(notification_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Notification deleted successfully",
    )))
}
