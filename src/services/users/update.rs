use actix_web::{HttpRequest, HttpResponse};

use super::UserService;
use crate::cache;
use crate::errors::PortalError;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        requests::{UpdatePreferencesRequest, UpdateUserRequest},
        responses::{PreferencesResponse, UserResponse},
    },
};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceError, ServiceResult, cache_from, current_actor};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password};

/// 用户资料变更后清除认证缓存
async fn invalidate_user_cache(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = cache_from(request) {
        cache.remove(&cache::user_cache_key(user_id)).await;
    }
}

pub(crate) async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    policy::authorize(&actor, Resource::User { id: user_id }, Action::Update)?;

    // 角色与状态只能由管理员修改
    if update_data.role.is_some() || update_data.status.is_some() {
        policy::authorize(&actor, Resource::UserPrivileges { id: user_id }, Action::Update)?;
    }

    let storage = service.get_storage(request);

    if let Some(email) = update_data.email.take() {
        let email = email.trim().to_lowercase();
        validate_email(&email).map_err(|msg| {
            ServiceError::new(ErrorCode::UserEmailInvalid, PortalError::validation(msg))
        })?;
        if let Some(existing) = storage.get_user_by_email(&email).await?
            && existing.id != user_id
        {
            return Err(ServiceError::new(
                ErrorCode::UserEmailAlreadyExists,
                PortalError::conflict("Email already exists"),
            ));
        }
        update_data.email = Some(email);
    }

    if let Some(password) = update_data.password.take() {
        validate_password(&password).map_err(|errors| {
            ServiceError::new(
                ErrorCode::UserPasswordInvalid,
                PortalError::validation(errors.join("; ")),
            )
        })?;
        update_data.password = Some(hash_password(&password)?);
    }

    let user = storage
        .update_user(user_id, update_data)
        .await?
        .ok_or_else(|| ServiceError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    invalidate_user_cache(request, user_id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserResponse { user },
        "User information updated successfully",
    )))
}

pub(crate) async fn update_preferences(
    service: &UserService,
    user_id: i64,
    update_data: UpdatePreferencesRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    policy::authorize(&actor, Resource::User { id: user_id }, Action::Update)?;

    let storage = service.get_storage(request);
    let user = storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    let preferences = update_data.apply_to(user.preferences);
    let user = storage
        .update_user_preferences(user_id, preferences)
        .await?
        .ok_or_else(|| ServiceError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    invalidate_user_cache(request, user_id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PreferencesResponse {
            preferences: user.preferences,
        },
        "Preferences updated successfully",
    )))
}
