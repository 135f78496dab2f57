use actix_web::{HttpRequest, HttpResponse};
use tracing::warn;

use super::{AnnouncementService, load_announcement};
use crate::models::ApiResponse;
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor, hub_from, relay::dispatch};

pub(crate) async fn delete_announcement(
    service: &AnnouncementService,
    announcement_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let announcement = load_announcement(&storage, announcement_id).await?;
    policy::authorize(&actor, Resource::Announcement(&announcement), Action::Delete)?;

    storage.delete_announcement(announcement_id).await?;

    let hub = hub_from(request);
    if let Err(e) = dispatch::announce_deleted(&storage, &hub, &announcement).await {
        warn!("Failed to push deletion of announcement {}: {}", announcement_id, e);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Announcement deleted successfully",
    )))
}
