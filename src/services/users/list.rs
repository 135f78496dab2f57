use actix_web::{HttpRequest, HttpResponse};

use super::UserService;
use crate::models::{ApiResponse, users::requests::UserListParams};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    policy::authorize(&actor, Resource::UserDirectory, Action::Read)?;

    let response = service
        .get_storage(request)
        .list_users_with_pagination(query.into())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "User list retrieved successfully",
    )))
}
