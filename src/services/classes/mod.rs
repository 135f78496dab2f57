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
    classes::{
        entities::Class,
        requests::{ClassQueryParams, CreateClassRequest, UpdateClassRequest},
    },
};
use crate::services::ServiceError;
use crate::storage::Storage;

const NAME_MAX_LEN: usize = 100;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        self.storage
            .clone()
            .unwrap_or_else(|| super::storage_from(request))
    }

    pub async fn list_classes(
        &self,
        query: ClassQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, list::list_classes(self, query, request).await)
    }

    pub async fn create_class(
        &self,
        class_data: CreateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, create::create_class(self, class_data, request).await)
    }

    pub async fn get_class(&self, class_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        super::respond(request, get::get_class(self, class_id, request).await)
    }

    pub async fn get_roster(
        &self,
        class_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, get::get_roster(self, class_id, request).await)
    }

    pub async fn update_class(
        &self,
        class_id: i64,
        update_data: UpdateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(
            request,
            update::update_class(self, class_id, update_data, request).await,
        )
    }

    pub async fn delete_class(
        &self,
        class_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, delete::delete_class(self, class_id, request).await)
    }
}

/// 读取班级，不存在时返回 ClassNotFound
pub(crate) async fn load_class(
    storage: &Arc<dyn Storage>,
    class_id: i64,
) -> Result<Class, ServiceError> {
    storage
        .get_class_by_id(class_id)
        .await?
        .ok_or_else(|| {
            ServiceError::not_found(ErrorCode::ClassNotFound, format!("Class {class_id} not found"))
        })
}

fn validate_capacity(capacity: i32) -> Result<(), ServiceError> {
    if capacity <= 0 {
        return Err(ServiceError::new(
            ErrorCode::ClassCapacityInvalid,
            PortalError::validation("Capacity must be greater than 0"),
        ));
    }
    Ok(())
}

fn validate_dates(
    start: Option<chrono::DateTime<chrono::Utc>>,
    end: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<(), ServiceError> {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(PortalError::validation("end_date must not be earlier than start_date").into());
    }
    Ok(())
}
