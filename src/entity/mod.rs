//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod announcements;
pub mod classes;
pub mod content_items;
pub mod content_modules;
pub mod enrollments;
pub mod messages;
pub mod notifications;
pub mod users;

use chrono::{DateTime, Utc};

/// 数据库中的 Unix 秒转换为 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

/// JSON 文本列解析，损坏或为空时回退到默认值
pub(crate) fn from_json_column<T>(raw: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    if raw.trim().is_empty() {
        return T::default();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Failed to decode JSON column, using default: {}", e);
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_column_fallback() {
        let tags: Vec<String> = from_json_column(r#"["algebra","week-1"]"#);
        assert_eq!(tags, vec!["algebra", "week-1"]);
        let empty: Vec<String> = from_json_column("");
        assert!(empty.is_empty());
        let broken: Vec<i64> = from_json_column("[1,");
        assert!(broken.is_empty());
    }

    #[test]
    fn test_to_datetime() {
        assert_eq!(to_datetime(0).timestamp(), 0);
        assert_eq!(to_datetime(1_700_000_000).timestamp(), 1_700_000_000);
    }
}
