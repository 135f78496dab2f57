use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    /// 通知类型
    #[ts(export, export_to = "notification.ts")]
    pub enum NotificationType("notification type") {
        Message => "message",
        Announcement => "announcement",
    }
}

crate::define_string_enum! {
    /// 通知引用的资源类型
    #[ts(export, export_to = "notification.ts")]
    pub enum ReferenceType("reference type") {
        Message => "message",
        Announcement => "announcement",
    }
}

/// 通知实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<ReferenceType>,
    pub reference_id: Option<i64>,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
