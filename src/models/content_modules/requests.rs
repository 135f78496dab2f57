use crate::models::common::{PaginationQuery, deserialize_option_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "content.ts")]
pub struct CreateContentModuleRequest {
    pub class_id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<i64>,
    pub position: Option<i32>,
}

// items 仅用于重新排序
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "content.ts")]
pub struct UpdateContentModuleRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<i32>,
    pub items: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "content.ts")]
pub struct AddModuleItemRequest {
    pub content_item_id: i64,
    pub position: Option<usize>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "content.ts")]
pub struct ContentModuleQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub class_id: Option<i64>,
}

// 模块列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ContentModuleListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
}

impl From<ContentModuleQueryParams> for ContentModuleListQuery {
    fn from(params: ContentModuleQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            class_id: params.class_id,
        }
    }
}
