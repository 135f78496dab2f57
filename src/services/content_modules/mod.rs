pub mod create;
pub mod delete;
pub mod get;
pub mod items;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::PortalError;
use crate::models::{
    ErrorCode,
    classes::entities::Class,
    content_modules::{
        entities::ContentModule,
        requests::{
            AddModuleItemRequest, ContentModuleQueryParams, CreateContentModuleRequest,
            UpdateContentModuleRequest,
        },
    },
};
use crate::services::{ServiceError, WithErrorCode, classes::load_class};
use crate::storage::Storage;

pub struct ContentModuleService {
    storage: Option<Arc<dyn Storage>>,
}

impl ContentModuleService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        self.storage
            .clone()
            .unwrap_or_else(|| super::storage_from(request))
    }

    pub async fn create_module(
        &self,
        module_data: CreateContentModuleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, create::create_module(self, module_data, request).await)
    }

    pub async fn list_modules(
        &self,
        query: ContentModuleQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, get::list_modules(self, query, request).await)
    }

    pub async fn get_module(
        &self,
        module_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, get::get_module(self, module_id, request).await)
    }

    pub async fn update_module(
        &self,
        module_id: i64,
        update_data: UpdateContentModuleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(
            request,
            update::update_module(self, module_id, update_data, request).await,
        )
    }

    pub async fn add_item(
        &self,
        module_id: i64,
        item_data: AddModuleItemRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(
            request,
            items::add_item(self, module_id, item_data, request).await,
        )
    }

    pub async fn remove_item(
        &self,
        module_id: i64,
        item_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(
            request,
            items::remove_item(self, module_id, item_id, request).await,
        )
    }

    pub async fn delete_module(
        &self,
        module_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, delete::delete_module(self, module_id, request).await)
    }
}

pub(crate) fn module_not_found(module_id: i64) -> ServiceError {
    ServiceError::not_found(
        ErrorCode::ContentModuleNotFound,
        format!("Content module {module_id} not found"),
    )
}

/// 加载模块及其所属班级
pub(crate) async fn load_module(
    storage: &Arc<dyn Storage>,
    module_id: i64,
) -> Result<(ContentModule, Class), ServiceError> {
    let module = storage
        .get_content_module_by_id(module_id)
        .await?
        .ok_or_else(|| module_not_found(module_id))?;
    let class = load_class(storage, module.class_id).await?;
    Ok((module, class))
}

/// 模块只能引用同一班级或不属于任何班级的内容
pub(crate) async fn ensure_items_usable(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    item_ids: &[i64],
) -> Result<(), ServiceError> {
    for item_id in item_ids {
        let item = storage
            .get_content_item_by_id(*item_id)
            .await?
            .ok_or_else(|| {
                PortalError::validation(format!("Content item {item_id} does not exist"))
            })
            .with_code(ErrorCode::ContentModuleItemInvalid)?;

        if let Some(owner_class) = item.class_id
            && owner_class != class_id
        {
            return Err(ServiceError::new(
                ErrorCode::ContentModuleItemInvalid,
                PortalError::validation(format!(
                    "Content item {item_id} belongs to another class"
                )),
            ));
        }
    }
    Ok(())
}
