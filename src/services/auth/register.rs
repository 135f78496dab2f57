use actix_web::{HttpRequest, HttpResponse};

use super::AuthService;
use crate::errors::PortalError;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::requests::RegisterRequest,
    users::{entities::UserRole, requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::{ServiceError, ServiceResult};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_username};

pub(crate) async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let storage = service.get_storage(request);

    let username = register_request.username.trim().to_string();
    let email = register_request.email.trim().to_lowercase();

    // 1. 字段校验
    validate_username(&username)
        .map_err(|msg| ServiceError::new(ErrorCode::UserNameInvalid, PortalError::validation(msg)))?;
    validate_email(&email).map_err(|msg| {
        ServiceError::new(ErrorCode::UserEmailInvalid, PortalError::validation(msg))
    })?;
    validate_password(&register_request.password).map_err(|errors| {
        ServiceError::new(
            ErrorCode::UserPasswordInvalid,
            PortalError::validation(errors.join("; ")),
        )
    })?;

    // 管理员账号只能由已有管理员创建
    let role = register_request.role.unwrap_or(UserRole::Student);
    if role == UserRole::Admin {
        return Err(ServiceError::new(
            ErrorCode::RegisterFailed,
            PortalError::authorization("Cannot self-register as admin"),
        ));
    }

    // 2. 唯一性检查
    if storage.get_user_by_username(&username).await?.is_some() {
        return Err(ServiceError::new(
            ErrorCode::UserNameAlreadyExists,
            PortalError::conflict("Username already exists"),
        ));
    }
    if storage.get_user_by_email(&email).await?.is_some() {
        return Err(ServiceError::new(
            ErrorCode::UserEmailAlreadyExists,
            PortalError::conflict("Email already exists"),
        ));
    }

    // 3. 哈希密码并创建用户
    let create_request = CreateUserRequest {
        profile: register_request.profile(),
        username,
        email,
        password: hash_password(&register_request.password)?,
        role,
    };

    let user = storage.create_user(create_request).await?;
    tracing::info!("Registered user {} ({})", user.username, user.role);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        UserResponse { user },
        "Registration successful",
    )))
}
