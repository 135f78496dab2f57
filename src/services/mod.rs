pub mod announcements;
pub mod auth;
pub mod classes;
pub mod content_items;
pub mod content_modules;
pub mod enrollments;
pub mod messages;
pub mod notifications;
pub mod relay;
pub mod users;

pub use announcements::AnnouncementService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use content_items::ContentItemService;
pub use content_modules::ContentModuleService;
pub use enrollments::EnrollmentService;
pub use messages::MessageService;
pub use notifications::NotificationService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode, web};
use std::sync::Arc;
use tracing::error;

use crate::cache::ObjectCache;
use crate::errors::PortalError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::User};
use crate::policy::Actor;
use crate::storage::Storage;
use relay::RelayHub;

/// 服务层错误：内部错误 + 返回给客户端的业务码
#[derive(Debug)]
pub(crate) struct ServiceError {
    error: PortalError,
    code: ErrorCode,
}

pub(crate) type ServiceResult = Result<HttpResponse, ServiceError>;

impl ServiceError {
    pub(crate) fn new(code: ErrorCode, error: PortalError) -> Self {
        Self { error, code }
    }

    /// 404，携带具体的业务码
    pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, PortalError::not_found(message))
    }

    pub(crate) fn status(&self) -> StatusCode {
        status_for(&self.error)
    }

    pub(crate) fn into_response(self, request: &HttpRequest) -> HttpResponse {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "{} {} failed: {}",
                request.method(),
                request.path(),
                self.error
            );
            return HttpResponse::build(status).json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Internal server error",
            ));
        }
        HttpResponse::build(status).json(ApiResponse::error_empty(self.code, self.error.message()))
    }
}

impl From<PortalError> for ServiceError {
    fn from(error: PortalError) -> Self {
        let code = default_code(&error);
        Self { error, code }
    }
}

/// 为存储层结果指定业务码
pub(crate) trait WithErrorCode<T> {
    fn with_code(self, code: ErrorCode) -> Result<T, ServiceError>;
}

impl<T> WithErrorCode<T> for Result<T, PortalError> {
    fn with_code(self, code: ErrorCode) -> Result<T, ServiceError> {
        self.map_err(|error| ServiceError::new(code, error))
    }
}

/// PortalError 对应的 HTTP 状态码
pub fn status_for(error: &PortalError) -> StatusCode {
    match error {
        PortalError::Validation(_) | PortalError::DateParse(_) => StatusCode::BAD_REQUEST,
        PortalError::Authentication(_) => StatusCode::UNAUTHORIZED,
        PortalError::Authorization(_) => StatusCode::FORBIDDEN,
        PortalError::NotFound(_) => StatusCode::NOT_FOUND,
        PortalError::Conflict(_) | PortalError::ClassFull(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn default_code(error: &PortalError) -> ErrorCode {
    match error {
        PortalError::Validation(_) | PortalError::DateParse(_) => ErrorCode::BadRequest,
        PortalError::Authentication(_) => ErrorCode::Unauthorized,
        PortalError::Authorization(_) => ErrorCode::Forbidden,
        PortalError::NotFound(_) => ErrorCode::NotFound,
        PortalError::Conflict(_) => ErrorCode::Conflict,
        PortalError::ClassFull(_) => ErrorCode::ClassFull,
        _ => ErrorCode::InternalServerError,
    }
}

/// 将服务结果转换为响应
pub(crate) fn respond(request: &HttpRequest, result: ServiceResult) -> ActixResult<HttpResponse> {
    Ok(result.unwrap_or_else(|e| e.into_response(request)))
}

/// 当前登录用户（由 RequireJWT 写入）
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, ServiceError> {
    RequireJWT::extract_user_claims(request)
        .ok_or_else(|| PortalError::authentication("Unauthorized access, please login").into())
}

pub(crate) fn current_actor(request: &HttpRequest) -> Result<Actor, ServiceError> {
    current_user(request).map(|user| Actor::from(&user))
}

pub(crate) fn storage_from(request: &HttpRequest) -> Arc<dyn Storage> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn cache_from(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
}

pub(crate) fn hub_from(request: &HttpRequest) -> web::Data<RelayHub> {
    request
        .app_data::<web::Data<RelayHub>>()
        .expect("Relay hub not found in app data")
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&PortalError::validation("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&PortalError::authentication("x")), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&PortalError::authorization("x")), StatusCode::FORBIDDEN);
        assert_eq!(status_for(&PortalError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&PortalError::class_full("x")), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&PortalError::database_operation("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_server_errors_hide_details() {
        let req = TestRequest::get().uri("/api/v1/classes").to_http_request();
        let resp = ServiceError::from(PortalError::database_operation("disk I/O error"))
            .into_response(&req);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = actix_web::body::to_bytes(resp.into_body())
            .await
            .expect("body");
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("Internal server error"));
        assert!(!text.contains("disk I/O"));
    }

    #[actix_web::test]
    async fn test_client_errors_keep_business_code() {
        let req = TestRequest::get().to_http_request();
        let resp = ServiceError::not_found(ErrorCode::ClassNotFound, "Class 3 not found")
            .into_response(&req);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = actix_web::body::to_bytes(resp.into_body())
            .await
            .expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["code"], ErrorCode::ClassNotFound as i32);
        assert_eq!(json["message"], "Class 3 not found");
    }
}
