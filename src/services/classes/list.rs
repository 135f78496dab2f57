use actix_web::{HttpRequest, HttpResponse};

use super::ClassService;
use crate::models::{ApiResponse, classes::requests::ClassQueryParams};
use crate::services::{ServiceResult, current_user};

pub(crate) async fn list_classes(
    service: &ClassService,
    query: ClassQueryParams,
    request: &HttpRequest,
) -> ServiceResult {
    current_user(request)?;

    let response = service
        .get_storage(request)
        .list_classes_with_pagination(query.into())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Class list retrieved successfully",
    )))
}
