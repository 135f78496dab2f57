#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use school_portal::cache::ObjectCache;
use school_portal::cache::object_cache::moka::MokaCacheWrapper;
use school_portal::models::users::entities::{User, UserProfile, UserRole};
use school_portal::models::users::requests::CreateUserRequest;
use school_portal::services::relay::RelayHub;
use school_portal::storage::Storage;
use school_portal::storage::sea_orm_storage::SeaOrmStorage;
use school_portal::utils::jwt::JwtUtils;
use school_portal::utils::password::hash_password;

pub const PASSWORD: &str = "Classroom2024";

pub struct TestContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub hub: web::Data<RelayHub>,
}

pub async fn setup() -> TestContext {
    let storage = SeaOrmStorage::with_url("sqlite::memory:", 1, 5)
        .await
        .expect("in-memory storage");
    let cache = MokaCacheWrapper::new().expect("moka cache");
    TestContext {
        storage: Arc::new(storage),
        cache: Arc::new(cache),
        hub: web::Data::new(RelayHub::new()),
    }
}

pub async fn seed_user(ctx: &TestContext, username: &str, role: UserRole) -> User {
    ctx.storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.edu"),
            password: hash_password(PASSWORD).expect("hash"),
            role,
            profile: UserProfile::default(),
        })
        .await
        .expect("seed user")
}

pub fn access_token(user: &User) -> String {
    JwtUtils::generate_access_token(user.id, &user.role.to_string()).expect("access token")
}

pub fn bearer(user: &User) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", access_token(user)))
}

/// 构建带全部路由的测试应用
#[macro_export]
macro_rules! portal_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.storage.clone()))
                .app_data(actix_web::web::Data::new($ctx.cache.clone()))
                .app_data($ctx.hub.clone())
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(school_portal::utils::json_error_handler),
                )
                .configure(school_portal::routes::configure_api_routes),
        )
        .await
    };
}

/// 发送请求，返回状态码与 JSON 响应体
#[macro_export]
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (status, body)
    }};
}
