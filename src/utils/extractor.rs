//! 路径参数安全提取
//!
//! 非法的路径 ID 直接返回统一格式的 400 响应，而不是 actix 默认的纯文本错误。

use actix_web::{HttpRequest, HttpResponse, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

/// 从路径中读取正整数 ID
pub fn parse_path_i64(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(param).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let message = format!("Invalid path parameter '{param}': '{raw}'");
            let response = HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
            Err(InternalError::from_response(message, response).into())
        }
    }
}

/// 定义一个从指定路径参数提取 i64 的 extractor
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = std::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                std::future::ready($crate::utils::extractor::parse_path_i64(req, $param).map($name))
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeItemIdI64, "item_id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{FromRequest, test};

    #[actix_web::test]
    async fn test_valid_id_is_extracted() {
        let req = test::TestRequest::default()
            .param("id", "42")
            .to_http_request();
        let id = SafeIDI64::extract(&req).await.expect("valid id");
        assert_eq!(id, SafeIDI64(42));
    }

    #[actix_web::test]
    async fn test_invalid_id_is_rejected() {
        for raw in ["abc", "-3", "0", ""] {
            let req = test::TestRequest::default()
                .param("id", raw)
                .to_http_request();
            let err = SafeIDI64::extract(&req).await.expect_err("invalid id");
            assert_eq!(
                err.as_response_error().status_code(),
                actix_web::http::StatusCode::BAD_REQUEST
            );
        }
    }
}
