pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::PortalError;
use crate::models::{
    ErrorCode,
    announcements::{
        entities::{Announcement, Audience},
        requests::{
            AnnouncementQueryParams, AnnouncementViewer, CreateAnnouncementRequest,
            UpdateAnnouncementRequest,
        },
    },
};
use crate::policy::{self, Action, Actor, Resource};
use crate::services::{ServiceError, WithErrorCode, classes::load_class};
use crate::storage::Storage;
use crate::utils::validate::validate_required_text;

const TITLE_MAX_LEN: usize = 200;
const CONTENT_MAX_LEN: usize = 10_000;

pub struct AnnouncementService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnnouncementService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        self.storage
            .clone()
            .unwrap_or_else(|| super::storage_from(request))
    }

    pub async fn create_announcement(
        &self,
        announcement_data: CreateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(
            request,
            create::create_announcement(self, announcement_data, request).await,
        )
    }

    pub async fn list_announcements(
        &self,
        query: AnnouncementQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, list::list_announcements(self, query, request).await)
    }

    pub async fn get_announcement(
        &self,
        announcement_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(
            request,
            get::get_announcement(self, announcement_id, request).await,
        )
    }

    pub async fn update_announcement(
        &self,
        announcement_id: i64,
        update_data: UpdateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(
            request,
            update::update_announcement(self, announcement_id, update_data, request).await,
        )
    }

    pub async fn delete_announcement(
        &self,
        announcement_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(
            request,
            delete::delete_announcement(self, announcement_id, request).await,
        )
    }
}

pub(crate) fn announcement_not_found(announcement_id: i64) -> ServiceError {
    ServiceError::not_found(
        ErrorCode::AnnouncementNotFound,
        format!("Announcement {announcement_id} not found"),
    )
}

pub(crate) async fn load_announcement(
    storage: &Arc<dyn Storage>,
    announcement_id: i64,
) -> Result<Announcement, ServiceError> {
    storage
        .get_announcement_by_id(announcement_id)
        .await?
        .ok_or_else(|| announcement_not_found(announcement_id))
}

/// 非管理员的可见范围
pub(crate) async fn viewer_for(
    storage: &Arc<dyn Storage>,
    actor: &Actor,
) -> Result<Option<AnnouncementViewer>, ServiceError> {
    if actor.is_admin() {
        return Ok(None);
    }
    Ok(Some(AnnouncementViewer {
        user_id: actor.user_id,
        role: actor.role,
        class_ids: storage.list_user_class_ids(actor.user_id).await?,
    }))
}

/// 校验发布到该受众的权限；班级受众需要班级存在且由发布者任教
pub(crate) async fn authorize_audience(
    storage: &Arc<dyn Storage>,
    actor: &Actor,
    audience: Audience,
) -> Result<(), ServiceError> {
    match audience {
        Audience::Class(class_id) => {
            let class = load_class(storage, class_id).await?;
            policy::authorize(
                actor,
                Resource::NewAnnouncement {
                    class: Some(&class),
                },
                Action::Create,
            )?;
        }
        Audience::All | Audience::Role(_) => {
            policy::authorize(actor, Resource::NewAnnouncement { class: None }, Action::Create)?;
        }
    }
    Ok(())
}

fn validate_text(title: Option<&str>, content: Option<&str>) -> Result<(), PortalError> {
    if let Some(title) = title {
        validate_required_text("title", title, TITLE_MAX_LEN).map_err(PortalError::validation)?;
    }
    if let Some(content) = content {
        validate_required_text("content", content, CONTENT_MAX_LEN)
            .map_err(PortalError::validation)?;
    }
    Ok(())
}

fn resolve_audience(announcement: &Announcement) -> Result<Audience, ServiceError> {
    announcement
        .audience()
        .map_err(PortalError::validation)
        .with_code(ErrorCode::AnnouncementTargetInvalid)
}
