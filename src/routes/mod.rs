pub mod announcements;

pub mod auth;

pub mod classes;

pub mod content;

pub mod enrollments;

pub mod messages;

pub mod notifications;

pub mod relay;

pub mod users;

pub use announcements::configure_announcement_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use content::configure_content_routes;
pub use enrollments::configure_enrollment_routes;
pub use messages::configure_message_routes;
pub use notifications::configure_notification_routes;
pub use relay::configure_relay_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_classes_routes)
        .configure(configure_enrollment_routes)
        .configure(configure_content_routes)
        .configure(configure_message_routes)
        .configure(configure_announcement_routes)
        .configure(configure_notification_routes)
        .configure(configure_relay_routes);
}
