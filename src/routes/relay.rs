use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::debug;

use crate::services::relay::{RelayHub, SessionContext, session};
use crate::services::{cache_from, storage_from};

/// 升级为 WebSocket；认证在连接建立后通过 `authenticate` 事件完成
pub async fn connect(
    req: HttpRequest,
    body: web::Payload,
    hub: web::Data<RelayHub>,
) -> ActixResult<HttpResponse> {
    let (response, session, stream) = actix_ws::handle(&req, body)?;

    let ctx = SessionContext {
        hub,
        storage: storage_from(&req),
        cache: cache_from(&req),
    };
    debug!("Relay upgrade from {:?}", req.peer_addr());
    actix_web::rt::spawn(session::run_session(ctx, session, stream));

    Ok(response)
}

// 配置路由
pub fn configure_relay_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/ws", web::get().to(connect));
}
