/*!
 * WebSocket 会话
 *
 * 连接建立时不需要凭证，客户端随后发送 `authenticate` 事件完成认证：
 *
 * ```text
 * → {"event":"authenticate","data":{"token":"<access token>"}}
 * ← {"event":"authenticated","data":{"user_id":7,"role":"student"}}
 * → {"event":"private-message","data":{"recipient_id":3,"subject":"Lab","content":"...","ack_id":"a1"}}
 * ← {"event":"message-ack","data":{"ack_id":"a1","success":true,"message_id":42,"error":null}}
 * ```
 *
 * 帧解析失败或业务错误只向当前连接返回 `error`，不会断开连接。
 */

use actix_web::web;
use actix_ws::Message as WsFrame;
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::dispatch;
use super::hub::{ConnectionId, RelayHub};
use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::middlewares::require_jwt::authenticate_access_token;
use crate::models::messages::requests::SendMessageRequest;
use crate::models::relay::events::{ClientEvent, ServerEvent};
use crate::storage::Storage;

/// 会话依赖
#[derive(Clone)]
pub struct SessionContext {
    pub hub: web::Data<RelayHub>,
    pub storage: Arc<dyn Storage>,
    pub cache: Option<Arc<dyn ObjectCache>>,
}

pub fn parse_frame(text: &str) -> Result<ClientEvent, ServerEvent> {
    serde_json::from_str(text).map_err(|e| ServerEvent::error(format!("Invalid frame: {e}")))
}

/// 处理一个客户端事件，回复经由 hub 发送给该连接
pub async fn handle_event(ctx: &SessionContext, conn_id: ConnectionId, event: ClientEvent) {
    let hub = ctx.hub.get_ref();
    match event {
        ClientEvent::Ping => {
            hub.send_to_connection(conn_id, ServerEvent::Pong);
        }
        ClientEvent::Authenticate { token } => {
            match authenticate_access_token(&token, &ctx.storage, ctx.cache.as_ref()).await {
                Ok(user) => {
                    hub.authenticate(conn_id, user.id, user.role);
                    info!("Relay connection {} authenticated as user {}", conn_id, user.id);
                    hub.send_to_connection(
                        conn_id,
                        ServerEvent::Authenticated {
                            user_id: user.id,
                            role: user.role,
                        },
                    );
                }
                Err(e) => {
                    // 认证失败后连接回到未认证状态
                    hub.deauthenticate(conn_id);
                    debug!("Relay authentication failed on {}: {}", conn_id, e);
                    hub.send_to_connection(
                        conn_id,
                        ServerEvent::error(format!("Authentication failed: {e}")),
                    );
                }
            }
        }
        ClientEvent::PrivateMessage {
            recipient_id,
            subject,
            content,
            ack_id,
        } => {
            let Some((sender_id, _)) = hub.identity(conn_id) else {
                hub.send_to_connection(conn_id, ServerEvent::error("Not authenticated"));
                return;
            };

            let request = SendMessageRequest {
                recipient_id,
                subject,
                content,
            };
            let timeout = AppConfig::get().relay_ack_timeout();
            let outcome = tokio::time::timeout(
                timeout,
                dispatch::send_private_message(&ctx.storage, hub, sender_id, request),
            )
            .await;

            let ack = match outcome {
                Ok(Ok(message)) => ServerEvent::MessageAck {
                    ack_id,
                    success: true,
                    message_id: Some(message.id),
                    error: None,
                },
                Ok(Err(e)) => ServerEvent::MessageAck {
                    ack_id,
                    success: false,
                    message_id: None,
                    error: Some(e.message().to_string()),
                },
                Err(_) => {
                    warn!(
                        "Private message from user {} timed out after {:?}",
                        sender_id, timeout
                    );
                    ServerEvent::MessageAck {
                        ack_id,
                        success: false,
                        message_id: None,
                        error: Some("timeout".to_string()),
                    }
                }
            };
            hub.send_to_connection(conn_id, ack);
        }
    }
}

/// 驱动一个 WebSocket 连接直到关闭
pub async fn run_session(
    ctx: SessionContext,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) {
    let (conn_id, mut outbound) = ctx.hub.connect();
    info!("Relay connection {} opened", conn_id);

    let interval = Duration::from_secs(AppConfig::get().relay.heartbeat_interval_secs.max(1));
    let mut heartbeat = tokio::time::interval(interval);
    heartbeat.tick().await;

    loop {
        tokio::select! {
            frame = stream.next() => {
                match frame {
                    Some(Ok(WsFrame::Text(text))) => match parse_frame(&text) {
                        // 私信需要等待持久化，放到后台避免阻塞读循环
                        Ok(event @ ClientEvent::PrivateMessage { .. }) => {
                            let ctx = ctx.clone();
                            actix_web::rt::spawn(async move {
                                handle_event(&ctx, conn_id, event).await;
                            });
                        }
                        Ok(event) => handle_event(&ctx, conn_id, event).await,
                        Err(error) => {
                            ctx.hub.send_to_connection(conn_id, error);
                        }
                    },
                    Some(Ok(WsFrame::Ping(data))) => {
                        if session.pong(&data).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(WsFrame::Binary(_))) => {
                        ctx.hub.send_to_connection(
                            conn_id,
                            ServerEvent::error("Binary frames are not supported"),
                        );
                    }
                    Some(Ok(WsFrame::Close(reason))) => {
                        debug!("Relay connection {} closed by client: {:?}", conn_id, reason);
                        break;
                    }
                    None => break,
                    Some(Err(e)) => {
                        warn!("Relay protocol error on {}: {}", conn_id, e);
                        break;
                    }
                    _ => {}
                }
            }

            event = outbound.recv() => {
                match event {
                    Some(event) => {
                        if session.text(event.to_json()).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            _ = heartbeat.tick() => {
                if session.ping(b"").await.is_err() {
                    break;
                }
            }
        }
    }

    ctx.hub.disconnect(conn_id);
    let _ = session.close(None).await;
    info!("Relay connection {} closed", conn_id);
}
