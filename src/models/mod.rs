//! 数据模型定义
//!
//! 每个资源分为 entities（业务实体）、requests（请求参数）、responses（响应结构）。

pub mod announcements;
pub mod auth;
pub mod classes;
pub mod common;
pub mod content_items;
pub mod content_modules;
pub mod enrollments;
pub mod messages;
pub mod notifications;
pub mod relay;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// 0 表示成功；1xxx 通用错误；2xxx 用户与认证；3xxx 班级与选课；
/// 4xxx 教学内容；5xxx 消息、公告与通知。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,

    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNotFound = 2002,
    UserNameInvalid = 2003,
    UserNameAlreadyExists = 2004,
    UserEmailInvalid = 2005,
    UserEmailAlreadyExists = 2006,
    UserPasswordInvalid = 2007,
    UserUpdateFailed = 2008,
    UserInactive = 2009,

    ClassNotFound = 3000,
    ClassPermissionDenied = 3001,
    ClassCreationFailed = 3002,
    ClassCapacityInvalid = 3003,
    ClassFull = 3004,
    EnrollmentNotFound = 3100,
    EnrollmentAlreadyActive = 3101,
    EnrollmentTransitionInvalid = 3102,
    EnrollmentClassInactive = 3103,

    ContentItemNotFound = 4000,
    ContentModuleNotFound = 4100,
    ContentModuleItemInvalid = 4101,

    MessageNotFound = 5000,
    MessageRecipientInvalid = 5001,
    AnnouncementNotFound = 5100,
    AnnouncementTargetInvalid = 5101,
    NotificationNotFound = 5200,
}
