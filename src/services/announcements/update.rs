use actix_web::{HttpRequest, HttpResponse};
use tracing::warn;

use super::{
    AnnouncementService, announcement_not_found, authorize_audience, load_announcement,
    resolve_audience, validate_text,
};
use crate::models::{
    ApiResponse, ErrorCode, announcements::requests::UpdateAnnouncementRequest,
};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, WithErrorCode, current_actor, hub_from, relay::dispatch};

pub(crate) async fn update_announcement(
    service: &AnnouncementService,
    announcement_id: i64,
    update_data: UpdateAnnouncementRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let existing = load_announcement(&storage, announcement_id).await?;
    policy::authorize(&actor, Resource::Announcement(&existing), Action::Update)?;

    validate_text(update_data.title.as_deref(), update_data.content.as_deref())?;
    let previous = resolve_audience(&existing)?;

    // 受众有变化时按新受众重新校验发布权限
    let touches_audience = update_data.target_audience.is_some()
        || update_data.target_class_id.is_some()
        || update_data.target_role.is_some();
    if touches_audience {
        let merged = UpdateAnnouncementRequest {
            target_audience: update_data.target_audience,
            target_class_id: update_data.target_class_id,
            target_role: update_data.target_role,
            ..Default::default()
        }
        .apply_to(existing.clone());
        let audience = resolve_audience(&merged)?;
        if audience != previous {
            authorize_audience(&storage, &actor, audience).await?;
        }
    }

    let announcement = storage
        .update_announcement(announcement_id, update_data)
        .await
        .with_code(ErrorCode::AnnouncementTargetInvalid)?
        .ok_or_else(|| announcement_not_found(announcement_id))?;

    let hub = hub_from(request);
    if let Err(e) = dispatch::announce_updated(&storage, &hub, previous, &announcement).await {
        warn!("Failed to push update of announcement {}: {}", announcement.id, e);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        announcement,
        "Announcement updated successfully",
    )))
}
