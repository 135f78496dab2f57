use super::entities::{ContentStatus, ContentType};
use crate::models::common::{PaginationQuery, deserialize_option_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "content.ts")]
pub struct CreateContentItemRequest {
    pub title: String,
    pub description: Option<String>,
    pub content_type: ContentType,
    pub content: String,
    pub class_id: Option<i64>,
    pub status: Option<ContentStatus>,
    #[serde(default)]
    pub tags: Vec<String>,
}

// 携带 content 的更新会生成新版本
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "content.ts")]
pub struct UpdateContentItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content_type: Option<ContentType>,
    pub content: Option<String>,
    pub class_id: Option<i64>,
    pub status: Option<ContentStatus>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "content.ts")]
pub struct ContentItemQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub author_id: Option<i64>,
    pub status: Option<ContentStatus>,
    pub content_type: Option<ContentType>,
    pub search: Option<String>,
}

// 内容列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ContentItemListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    pub author_id: Option<i64>,
    pub status: Option<ContentStatus>,
    pub content_type: Option<ContentType>,
    pub search: Option<String>,
    /// 非作者只能看到已发布内容：Some(viewer_id) 时返回 已发布 或 作者为 viewer 的内容
    pub visible_to: Option<i64>,
}

impl From<ContentItemQueryParams> for ContentItemListQuery {
    fn from(params: ContentItemQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            class_id: params.class_id,
            author_id: params.author_id,
            status: params.status,
            content_type: params.content_type,
            search: params.search,
            visible_to: None,
        }
    }
}
