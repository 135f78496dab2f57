use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    /// 班级状态
    #[ts(export, export_to = "class.ts")]
    pub enum ClassStatus("class status") {
        Active => "active",
        Archived => "archived",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 班级名称
    pub name: String,
    pub description: Option<String>,
    // 学科
    pub subject: Option<String>,
    // 教师ID
    pub teacher_id: i64,
    // 容量上限
    pub capacity: i32,
    // 当前 active 选课人数
    pub enrollment_count: i32,
    pub status: ClassStatus,
    // 上课时间安排（自由文本）
    pub schedule: Option<String>,
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Class {
    pub fn is_full(&self) -> bool {
        self.enrollment_count >= self.capacity
    }
}
