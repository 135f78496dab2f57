use actix_web::{HttpRequest, HttpResponse};

use super::AuthService;
use crate::errors::PortalError;
use crate::models::auth::responses::{
    RefreshTokenResponse, TokenVerificationResponse, UserInfoResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{ServiceError, ServiceResult, current_user};
use crate::utils::jwt::JwtUtils;

fn expired_login() -> HttpResponse {
    // 清除无效的 refresh token cookie
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub(crate) async fn handle_refresh_token(service: &AuthService, request: &HttpRequest) -> ServiceResult {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Err(ServiceError::from(PortalError::authentication(
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(expired_login());
        }
    };

    // 重新读取用户，角色变更或停用立即生效
    let user = match claims.user_id() {
        Some(user_id) => service.get_storage(request).get_user_by_id(user_id).await?,
        None => None,
    };
    let Some(user) = user.filter(|u| u.is_active()) else {
        return Ok(expired_login());
    };

    let access_token = JwtUtils::generate_access_token(user.id, &user.role.to_string())
        .map_err(|e| PortalError::serialization(format!("Failed to issue token: {e}")))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RefreshTokenResponse {
            access_token,
            expires_in: JwtUtils::access_token_ttl_secs(),
        },
        "Token refreshed successfully",
    )))
}

pub(crate) async fn handle_logout(_service: &AuthService, _request: &HttpRequest) -> ServiceResult {
    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logged out")))
}

pub(crate) fn handle_verify_token(request: &HttpRequest) -> ServiceResult {
    current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse { is_valid: true },
        "Token is valid",
    )))
}

pub(crate) fn handle_get_user(request: &HttpRequest) -> ServiceResult {
    let user = current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user },
        "User information retrieved successfully",
    )))
}
