use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::messages::requests::{MessageBox, MessageQueryParams, SendMessageRequest};
use crate::services::MessageService;
use crate::utils::SafeIDI64;

static MESSAGE_SERVICE: Lazy<MessageService> = Lazy::new(MessageService::new_lazy);

pub async fn send_message(
    req: HttpRequest,
    message_data: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE
        .send_message(message_data.into_inner(), &req)
        .await
}

pub async fn inbox(
    req: HttpRequest,
    query: web::Query<MessageQueryParams>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE
        .list_messages(MessageBox::Inbox, query.into_inner(), &req)
        .await
}

pub async fn outbox(
    req: HttpRequest,
    query: web::Query<MessageQueryParams>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE
        .list_messages(MessageBox::Outbox, query.into_inner(), &req)
        .await
}

pub async fn get_message(req: HttpRequest, message_id: SafeIDI64) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.get_message(message_id.0, &req).await
}

pub async fn mark_read(req: HttpRequest, message_id: SafeIDI64) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.mark_read(message_id.0, &req).await
}

pub async fn delete_message(req: HttpRequest, message_id: SafeIDI64) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.delete_message(message_id.0, &req).await
}

// 配置路由
pub fn configure_message_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/messages")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::post().to(send_message)))
            .service(web::resource("/inbox").route(web::get().to(inbox)))
            .service(web::resource("/outbox").route(web::get().to(outbox)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_message))
                    .route(web::delete().to(delete_message)),
            )
            .service(web::resource("/{id}/read").route(web::put().to(mark_read))),
    );
}
