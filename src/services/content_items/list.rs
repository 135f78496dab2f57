use actix_web::{HttpRequest, HttpResponse};

use super::ContentItemService;
use crate::models::{
    ApiResponse,
    content_items::requests::{ContentItemListQuery, ContentItemQueryParams},
};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn list_items(
    service: &ContentItemService,
    query: ContentItemQueryParams,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;

    let mut list_query = ContentItemListQuery::from(query);
    // 非管理员只能看到已发布内容和自己的草稿
    if !actor.is_admin() {
        list_query.visible_to = Some(actor.user_id);
    }

    let response = service
        .get_storage(request)
        .list_content_items_with_pagination(list_query)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Content item list retrieved successfully",
    )))
}
