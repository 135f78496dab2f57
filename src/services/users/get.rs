use actix_web::{HttpRequest, HttpResponse};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode, users::responses::UserResponse};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceError, ServiceResult, current_actor};

pub(crate) async fn get_user(service: &UserService, user_id: i64, request: &HttpRequest) -> ServiceResult {
    let actor = current_actor(request)?;
    policy::authorize(&actor, Resource::User { id: user_id }, Action::Read)?;

    let user = service
        .get_storage(request)
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserResponse { user },
        "User retrieved successfully",
    )))
}
