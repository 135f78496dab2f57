use super::entities::{ContentItem, ContentVersion};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "content.ts")]
pub struct ContentItemListResponse {
    pub items: Vec<ContentItem>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "content.ts")]
pub struct ContentVersionsResponse {
    pub item_id: i64,
    pub current_version: i32,
    pub versions: Vec<ContentVersion>,
}
