use super::entities::ContentModule;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "content.ts")]
pub struct ContentModuleListResponse {
    pub items: Vec<ContentModule>,
    pub pagination: PaginationInfo,
}
