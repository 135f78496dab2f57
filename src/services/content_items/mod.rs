pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::PortalError;
use crate::models::{
    ErrorCode,
    content_items::{
        entities::ContentItem,
        requests::{ContentItemQueryParams, CreateContentItemRequest, UpdateContentItemRequest},
    },
};
use crate::services::ServiceError;
use crate::storage::Storage;
use crate::utils::validate::validate_required_text;

const TITLE_MAX_LEN: usize = 200;
const BODY_MAX_LEN: usize = 100_000;
const MAX_TAGS: usize = 20;

pub struct ContentItemService {
    storage: Option<Arc<dyn Storage>>,
}

impl ContentItemService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        self.storage
            .clone()
            .unwrap_or_else(|| super::storage_from(request))
    }

    pub async fn create_item(
        &self,
        item_data: CreateContentItemRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, create::create_item(self, item_data, request).await)
    }

    pub async fn list_items(
        &self,
        query: ContentItemQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, list::list_items(self, query, request).await)
    }

    pub async fn get_item(&self, item_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        super::respond(request, get::get_item(self, item_id, request).await)
    }

    // 历史版本
    pub async fn list_versions(
        &self,
        item_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, get::list_versions(self, item_id, request).await)
    }

    pub async fn update_item(
        &self,
        item_id: i64,
        update_data: UpdateContentItemRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(
            request,
            update::update_item(self, item_id, update_data, request).await,
        )
    }

    pub async fn delete_item(&self, item_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        super::respond(request, delete::delete_item(self, item_id, request).await)
    }
}

pub(crate) fn item_not_found(item_id: i64) -> ServiceError {
    ServiceError::not_found(
        ErrorCode::ContentItemNotFound,
        format!("Content item {item_id} not found"),
    )
}

pub(crate) async fn load_item(
    storage: &Arc<dyn Storage>,
    item_id: i64,
) -> Result<ContentItem, ServiceError> {
    storage
        .get_content_item_by_id(item_id)
        .await?
        .ok_or_else(|| item_not_found(item_id))
}

fn validate_body(content: &str) -> Result<(), PortalError> {
    if content.chars().count() > BODY_MAX_LEN {
        return Err(PortalError::validation(format!(
            "content must be at most {BODY_MAX_LEN} characters"
        )));
    }
    Ok(())
}

/// 去除空白标签与重复标签
fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>, PortalError> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    if normalized.len() > MAX_TAGS {
        return Err(PortalError::validation(format!(
            "At most {MAX_TAGS} tags are allowed"
        )));
    }
    Ok(normalized)
}

fn validate_title(title: &str) -> Result<(), PortalError> {
    validate_required_text("title", title, TITLE_MAX_LEN).map_err(PortalError::validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(vec![
            " Algebra ".into(),
            "algebra".into(),
            "".into(),
            "Week-1".into(),
        ])
        .expect("valid tags");
        assert_eq!(tags, vec!["algebra".to_string(), "week-1".to_string()]);

        let too_many = (0..=MAX_TAGS).map(|i| format!("t{i}")).collect();
        assert!(normalize_tags(too_many).is_err());
    }
}
