use actix_web::{HttpRequest, HttpResponse};

use super::{AnnouncementService, viewer_for};
use crate::models::{
    ApiResponse,
    announcements::requests::{AnnouncementListQuery, AnnouncementQueryParams},
};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn list_announcements(
    service: &AnnouncementService,
    query: AnnouncementQueryParams,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);

    let include_expired = query.include_expired.unwrap_or(false);
    let list_query = AnnouncementListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        priority: query.priority,
        viewer: viewer_for(&storage, &actor).await?,
        active_at: (!include_expired).then(chrono::Utc::now),
    };

    let response = storage.list_announcements_with_pagination(list_query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Announcement list retrieved successfully",
    )))
}
