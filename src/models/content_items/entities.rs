use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    /// 内容类型
    #[ts(export, export_to = "content.ts")]
    pub enum ContentType("content type") {
        Lesson => "lesson",
        Assignment => "assignment",
        Quiz => "quiz",
        Resource => "resource",
    }
}

crate::define_string_enum! {
    /// 内容发布状态
    #[ts(export, export_to = "content.ts")]
    pub enum ContentStatus("content status") {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

// 历史版本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "content.ts")]
pub struct ContentVersion {
    pub version: i32,
    pub content: String,
    pub edited_by: i64,
    pub edited_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "content.ts")]
pub struct ContentItem {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub content_type: ContentType,
    pub content: String,
    pub class_id: Option<i64>,
    pub author_id: i64,
    pub status: ContentStatus,
    // 当前版本号，从 1 开始
    pub version: i32,
    pub previous_versions: Vec<ContentVersion>,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// 替换正文：旧正文连同旧版本号进入历史，版本号加一
    pub fn revise(&mut self, content: String, edited_by: i64, edited_at: DateTime<Utc>) {
        let previous = std::mem::replace(&mut self.content, content);
        self.previous_versions.push(ContentVersion {
            version: self.version,
            content: previous,
            edited_by,
            edited_at,
        });
        self.version += 1;
    }

    /// 变更状态；首次发布时记录发布时间
    pub fn set_status(&mut self, status: ContentStatus, at: DateTime<Utc>) {
        if status == ContentStatus::Published && self.published_at.is_none() {
            self.published_at = Some(at);
        }
        self.status = status;
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContentItem {
        let now = Utc::now();
        ContentItem {
            id: 1,
            title: "Fractions".to_string(),
            description: None,
            content_type: ContentType::Lesson,
            content: "v1 body".to_string(),
            class_id: Some(3),
            author_id: 7,
            status: ContentStatus::Draft,
            version: 1,
            previous_versions: Vec::new(),
            tags: vec![],
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_each_revision_appends_one_history_entry() {
        let mut item = sample();
        let now = Utc::now();

        item.revise("v2 body".to_string(), 7, now);
        item.revise("v3 body".to_string(), 9, now);

        assert_eq!(item.version, 3);
        assert_eq!(item.content, "v3 body");
        assert_eq!(item.previous_versions.len(), 2);
        assert_eq!(item.previous_versions[0].version, 1);
        assert_eq!(item.previous_versions[0].content, "v1 body");
        assert_eq!(item.previous_versions[1].version, 2);
        assert_eq!(item.previous_versions[1].content, "v2 body");
        assert_eq!(item.previous_versions[1].edited_by, 9);
    }

    #[test]
    fn test_published_at_is_set_once() {
        let mut item = sample();
        let first = Utc::now();
        item.set_status(ContentStatus::Published, first);
        assert_eq!(item.published_at, Some(first));

        item.set_status(ContentStatus::Archived, first + chrono::Duration::hours(1));
        item.set_status(ContentStatus::Published, first + chrono::Duration::hours(2));
        assert_eq!(item.published_at, Some(first));
        assert!(item.is_published());
    }
}
