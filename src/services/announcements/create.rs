use actix_web::{HttpRequest, HttpResponse};
use tracing::error;

use super::{AnnouncementService, authorize_audience, validate_text};
use crate::errors::PortalError;
use crate::models::{
    ApiResponse, ErrorCode,
    announcements::{entities::Audience, requests::CreateAnnouncementRequest},
};
use crate::services::{ServiceResult, WithErrorCode, current_actor, hub_from, relay::dispatch};

pub(crate) async fn create_announcement(
    service: &AnnouncementService,
    announcement_data: CreateAnnouncementRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);

    let audience = Audience::resolve(
        announcement_data.target_audience,
        announcement_data.target_class_id,
        announcement_data.target_role,
    )
    .map_err(PortalError::validation)
    .with_code(ErrorCode::AnnouncementTargetInvalid)?;
    authorize_audience(&storage, &actor, audience).await?;

    validate_text(
        Some(&announcement_data.title),
        Some(&announcement_data.content),
    )?;

    let announcement = storage
        .create_announcement(actor.user_id, announcement_data)
        .await
        .with_code(ErrorCode::AnnouncementTargetInvalid)?;

    // 公告已保存，通知与推送失败只记录日志
    let hub = hub_from(request);
    if let Err(e) = dispatch::announce_created(&storage, &hub, &announcement).await {
        error!(
            "Failed to notify audience of announcement {}: {}",
            announcement.id, e
        );
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(
        announcement,
        "Announcement created successfully",
    )))
}
