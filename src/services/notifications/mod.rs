pub mod count;
pub mod delete;
pub mod list;
pub mod read;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ErrorCode,
    notifications::{entities::Notification, requests::NotificationListQuery},
};
use crate::services::ServiceError;
use crate::storage::Storage;

pub struct NotificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        self.storage
            .clone()
            .unwrap_or_else(|| super::storage_from(request))
    }

    pub async fn list_notifications(
        &self,
        query: NotificationListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, list::list_notifications(self, query, request).await)
    }

    pub async fn get_unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        super::respond(request, count::get_unread_count(self, request).await)
    }

    pub async fn mark_as_read(
        &self,
        notification_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, read::mark_as_read(self, notification_id, request).await)
    }

    pub async fn mark_all_as_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        super::respond(request, read::mark_all_as_read(self, request).await)
    }

    pub async fn delete_notification(
        &self,
        notification_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(
            request,
            delete::delete_notification(self, notification_id, request).await,
        )
    }
}

pub(crate) fn notification_not_found(notification_id: i64) -> ServiceError {
    ServiceError::not_found(
        ErrorCode::NotificationNotFound,
        format!("Notification {notification_id} not found"),
    )
}

pub(crate) async fn load_notification(
    storage: &Arc<dyn Storage>,
    notification_id: i64,
) -> Result<Notification, ServiceError> {
    storage
        .get_notification_by_id(notification_id)
        .await?
        .ok_or_else(|| notification_not_found(notification_id))
}
