use actix_web::{HttpRequest, HttpResponse};

use super::{ClassService, NAME_MAX_LEN, load_class, validate_capacity, validate_dates};
use crate::errors::PortalError;
use crate::models::{ApiResponse, ErrorCode, classes::requests::UpdateClassRequest};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceError, ServiceResult, current_actor};
use crate::utils::validate::validate_required_text;

pub(crate) async fn update_class(
    service: &ClassService,
    class_id: i64,
    mut update_data: UpdateClassRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let class = load_class(&storage, class_id).await?;
    policy::authorize(&actor, Resource::Class(&class), Action::Update)?;

    if let Some(name) = update_data.name.take() {
        validate_required_text("name", &name, NAME_MAX_LEN).map_err(PortalError::validation)?;
        update_data.name = Some(name.trim().to_string());
    }
    if let Some(capacity) = update_data.capacity {
        validate_capacity(capacity)?;
    }
    validate_dates(
        update_data.start_date.or(class.start_date),
        update_data.end_date.or(class.end_date),
    )?;

    let class = storage
        .update_class(class_id, update_data)
        .await?
        .ok_or_else(|| {
            ServiceError::not_found(ErrorCode::ClassNotFound, format!("Class {class_id} not found"))
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Class updated successfully")))
}
