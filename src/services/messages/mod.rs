pub mod delete;
pub mod get;
pub mod list;
pub mod send;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ErrorCode,
    messages::{
        entities::Message,
        requests::{MessageBox, MessageQueryParams, SendMessageRequest},
    },
};
use crate::services::ServiceError;
use crate::storage::Storage;

pub struct MessageService {
    storage: Option<Arc<dyn Storage>>,
}

impl MessageService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        self.storage
            .clone()
            .unwrap_or_else(|| super::storage_from(request))
    }

    pub async fn send_message(
        &self,
        message_data: SendMessageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, send::send_message(self, message_data, request).await)
    }

    pub async fn list_messages(
        &self,
        mailbox: MessageBox,
        query: MessageQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(
            request,
            list::list_messages(self, mailbox, query, request).await,
        )
    }

    pub async fn get_message(
        &self,
        message_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, get::get_message(self, message_id, request).await)
    }

    pub async fn mark_read(&self, message_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        super::respond(request, get::mark_read(self, message_id, request).await)
    }

    pub async fn delete_message(
        &self,
        message_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, delete::delete_message(self, message_id, request).await)
    }
}

pub(crate) fn message_not_found(message_id: i64) -> ServiceError {
    ServiceError::not_found(
        ErrorCode::MessageNotFound,
        format!("Message {message_id} not found"),
    )
}

pub(crate) async fn load_message(
    storage: &Arc<dyn Storage>,
    message_id: i64,
) -> Result<Message, ServiceError> {
    storage
        .get_message_by_id(message_id)
        .await?
        .ok_or_else(|| message_not_found(message_id))
}
