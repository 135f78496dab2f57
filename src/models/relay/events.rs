//! WebSocket 帧格式：`{"event": <名称>, "data": <载荷>}`

use crate::models::announcements::entities::Announcement;
use crate::models::messages::entities::Message;
use crate::models::notifications::entities::Notification;
use crate::models::users::entities::UserRole;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 客户端发送的事件
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
#[ts(export, export_to = "relay.ts")]
pub enum ClientEvent {
    Authenticate {
        token: String,
    },
    PrivateMessage {
        recipient_id: i64,
        subject: String,
        content: String,
        ack_id: Option<String>,
    },
    Ping,
}

/// 服务端推送的事件
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
#[ts(export, export_to = "relay.ts")]
pub enum ServerEvent {
    Authenticated {
        user_id: i64,
        role: UserRole,
    },
    NewMessage(Message),
    NewNotification(Notification),
    NewAnnouncement(Announcement),
    AnnouncementUpdated(Announcement),
    AnnouncementDeleted {
        id: i64,
    },
    MessageAck {
        ack_id: Option<String>,
        success: bool,
        message_id: Option<i64>,
        error: Option<String>,
    },
    Pong,
    Error {
        message: String,
    },
}

impl ServerEvent {
    pub fn error<T: Into<String>>(message: T) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"event":"error","data":{{"message":"serialization failed: {e}"}}}}"#)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_events_parse() {
        let auth: ClientEvent =
            serde_json::from_str(r#"{"event":"authenticate","data":{"token":"abc"}}"#)
                .expect("authenticate frame");
        assert!(matches!(auth, ClientEvent::Authenticate { token } if token == "abc"));

        let pm: ClientEvent = serde_json::from_str(
            r#"{"event":"private-message","data":{"recipient_id":5,"subject":"hi","content":"there"}}"#,
        )
        .expect("private-message frame");
        assert!(matches!(
            pm,
            ClientEvent::PrivateMessage { recipient_id: 5, ack_id: None, .. }
        ));

        let ping: ClientEvent = serde_json::from_str(r#"{"event":"ping"}"#).expect("ping frame");
        assert!(matches!(ping, ClientEvent::Ping));

        assert!(serde_json::from_str::<ClientEvent>(r#"{"event":"shout","data":{}}"#).is_err());
    }

    #[test]
    fn test_server_event_shape() {
        let json = ServerEvent::AnnouncementDeleted { id: 9 }.to_json();
        assert_eq!(json, r#"{"event":"announcement-deleted","data":{"id":9}}"#);

        let ack = ServerEvent::MessageAck {
            ack_id: Some("a1".into()),
            success: false,
            message_id: None,
            error: Some("timeout".into()),
        };
        let value: serde_json::Value = serde_json::from_str(&ack.to_json()).expect("valid json");
        assert_eq!(value["event"], "message-ack");
        assert_eq!(value["data"]["error"], "timeout");
    }
}
