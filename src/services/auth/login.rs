use actix_web::{HttpRequest, HttpResponse};

use super::AuthService;
use crate::errors::PortalError;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::services::{ServiceError, ServiceResult};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

fn login_failed() -> ServiceError {
    ServiceError::new(
        ErrorCode::AuthFailed,
        PortalError::authentication("Username or password is incorrect"),
    )
}

pub(crate) async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let storage = service.get_storage(request);
    let config = service.get_config();

    // 1. 根据用户名或邮箱获取用户
    let user = storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await?
        .ok_or_else(login_failed)?;

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        tracing::info!("Failed login attempt for {}", user.username);
        return Err(login_failed());
    }

    if !user.is_active() {
        return Err(ServiceError::new(
            ErrorCode::UserInactive,
            PortalError::authorization("Account is not active"),
        ));
    }

    // 3. 更新最后登录时间（失败不影响登录）
    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.id, e);
    }

    // 4. 生成令牌对
    let refresh_days = if login_request.remember_me {
        config.jwt.refresh_token_remember_me_expiry
    } else {
        config.jwt.refresh_token_expiry
    };
    let token_pair = user
        .generate_token_pair(Some(chrono::Duration::days(refresh_days)))
        .map_err(PortalError::serialization)?;

    tracing::info!("User {} logged in successfully", user.username);

    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: JwtUtils::access_token_ttl_secs(),
        user,
        created_at: chrono::Utc::now(),
    };

    // 5. refresh token 写入 http-only cookie
    let refresh_cookie =
        JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_days);

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
