use actix_web::{HttpRequest, HttpResponse};

use super::MessageService;
use crate::models::{
    ApiResponse,
    messages::requests::{MessageBox, MessageListQuery, MessageQueryParams},
};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn list_messages(
    service: &MessageService,
    mailbox: MessageBox,
    query: MessageQueryParams,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;

    let list_query = MessageListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        user_id: actor.user_id,
        mailbox,
        // 发件箱不区分已读
        unread_only: mailbox == MessageBox::Inbox && query.unread_only.unwrap_or(false),
    };

    let response = service
        .get_storage(request)
        .list_messages_with_pagination(list_query)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Message list retrieved successfully",
    )))
}
