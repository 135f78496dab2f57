use actix_web::{HttpRequest, HttpResponse};

use super::{AnnouncementService, announcement_not_found, load_announcement, viewer_for};
use crate::models::ApiResponse;
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn get_announcement(
    service: &AnnouncementService,
    announcement_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let announcement = load_announcement(&storage, announcement_id).await?;
    policy::authorize(&actor, Resource::Announcement(&announcement), Action::Read)?;

    // 受众之外的用户看不到该公告
    if let Some(viewer) = viewer_for(&storage, &actor).await?
        && !viewer.can_see(&announcement)
    {
        return Err(announcement_not_found(announcement_id));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        announcement,
        "Announcement retrieved successfully",
    )))
}
