//! 消息与公告的投递
//!
//! REST 与 WebSocket 共用同一条路径：先持久化文档与通知，再尽力推送实时事件。
//! 实时推送失败不影响结果，通知记录是离线用户的兜底。

use std::sync::Arc;
use tracing::{debug, info};

use super::hub::{RelayHub, Room, Target};
use crate::errors::{PortalError, Result};
use crate::models::{
    announcements::entities::{Announcement, Audience},
    messages::{entities::Message, requests::SendMessageRequest},
    notifications::{
        entities::{Notification, NotificationType, ReferenceType},
        requests::CreateNotificationRequest,
    },
    relay::events::ServerEvent,
};
use crate::storage::Storage;
use crate::utils::validate::validate_required_text;

const SUBJECT_MAX_LEN: usize = 200;
const CONTENT_MAX_LEN: usize = 10_000;
const PREVIEW_LEN: usize = 120;

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_LEN).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

/// 发送私信：校验、持久化消息与收件人通知，并推送给收件人
pub async fn send_private_message(
    storage: &Arc<dyn Storage>,
    hub: &RelayHub,
    sender_id: i64,
    req: SendMessageRequest,
) -> Result<Message> {
    validate_required_text("subject", &req.subject, SUBJECT_MAX_LEN)
        .map_err(PortalError::validation)?;
    validate_required_text("content", &req.content, CONTENT_MAX_LEN)
        .map_err(PortalError::validation)?;

    if req.recipient_id == sender_id {
        return Err(PortalError::validation("Cannot send a message to yourself"));
    }

    match storage.get_user_by_id(req.recipient_id).await? {
        Some(recipient) if recipient.is_active() => {}
        Some(_) => {
            return Err(PortalError::validation(format!(
                "Recipient {} is not active",
                req.recipient_id
            )));
        }
        None => {
            return Err(PortalError::validation(format!(
                "Recipient {} does not exist",
                req.recipient_id
            )));
        }
    }

    let message = storage.create_message(sender_id, req).await?;
    deliver_message(storage, hub, &message).await?;
    Ok(message)
}

/// 为已持久化的私信生成通知并推送 `new-message` / `new-notification`
pub async fn deliver_message(
    storage: &Arc<dyn Storage>,
    hub: &RelayHub,
    message: &Message,
) -> Result<Notification> {
    let notification = storage
        .create_notification(CreateNotificationRequest {
            user_id: message.recipient_id,
            notification_type: NotificationType::Message,
            title: message.subject.clone(),
            content: Some(preview(&message.content)),
            reference_type: Some(ReferenceType::Message),
            reference_id: Some(message.id),
        })
        .await?;

    let room = Room::User(message.recipient_id);
    let delivered = hub.send_to_room(room, &ServerEvent::NewMessage(message.clone()));
    hub.send_to_room(room, &ServerEvent::NewNotification(notification.clone()));
    debug!(
        "Message {} delivered live to {} connection(s) of user {}",
        message.id, delivered, message.recipient_id
    );

    Ok(notification)
}

/// 受众对应的推送目标
pub async fn audience_target(storage: &Arc<dyn Storage>, audience: Audience) -> Result<Target> {
    Ok(match audience {
        Audience::All => Target::Everyone,
        Audience::Role(role) => Target::Room(Room::Role(role)),
        Audience::Class(class_id) => Target::Users(storage.list_class_member_ids(class_id).await?),
    })
}

/// 受众对应的通知接收人（活跃用户）
async fn audience_user_ids(storage: &Arc<dyn Storage>, audience: Audience) -> Result<Vec<i64>> {
    match audience {
        Audience::All => storage.list_active_user_ids(None).await,
        Audience::Role(role) => storage.list_active_user_ids(Some(role)).await,
        Audience::Class(class_id) => storage.list_class_member_ids(class_id).await,
    }
}

fn announcement_audience(announcement: &Announcement) -> Result<Audience> {
    announcement.audience().map_err(PortalError::validation)
}

/// 新公告：为受众（不含作者）写通知，并推送 `new-announcement`
///
/// 返回写入的通知数。
pub async fn announce_created(
    storage: &Arc<dyn Storage>,
    hub: &RelayHub,
    announcement: &Announcement,
) -> Result<usize> {
    let audience = announcement_audience(announcement)?;

    let recipients: Vec<i64> = audience_user_ids(storage, audience)
        .await?
        .into_iter()
        .filter(|id| *id != announcement.author_id)
        .collect();

    let requests = recipients
        .iter()
        .map(|user_id| CreateNotificationRequest {
            user_id: *user_id,
            notification_type: NotificationType::Announcement,
            title: announcement.title.clone(),
            content: Some(preview(&announcement.content)),
            reference_type: Some(ReferenceType::Announcement),
            reference_id: Some(announcement.id),
        })
        .collect::<Vec<_>>();
    let notifications = storage.create_notifications_batch(requests).await?;

    for notification in &notifications {
        hub.send_to_room(
            Room::User(notification.user_id),
            &ServerEvent::NewNotification(notification.clone()),
        );
    }

    let target = audience_target(storage, audience).await?;
    let delivered = hub.deliver(&[target], &ServerEvent::NewAnnouncement(announcement.clone()));
    info!(
        "Announcement {} created: {} notification(s), {} live delivery(ies)",
        announcement.id,
        notifications.len(),
        delivered
    );

    Ok(notifications.len())
}

/// 公告更新：推送 `announcement-updated`；受众变化时新旧受众都会收到
pub async fn announce_updated(
    storage: &Arc<dyn Storage>,
    hub: &RelayHub,
    previous: Audience,
    announcement: &Announcement,
) -> Result<usize> {
    let current = announcement_audience(announcement)?;

    let mut targets = vec![audience_target(storage, current).await?];
    if previous != current {
        targets.push(audience_target(storage, previous).await?);
    }

    Ok(hub.deliver(
        &targets,
        &ServerEvent::AnnouncementUpdated(announcement.clone()),
    ))
}

/// 公告删除：向原受众推送 `announcement-deleted`
pub async fn announce_deleted(
    storage: &Arc<dyn Storage>,
    hub: &RelayHub,
    announcement: &Announcement,
) -> Result<usize> {
    let audience = announcement_audience(announcement)?;
    let target = audience_target(storage, audience).await?;
    Ok(hub.deliver(
        &[target],
        &ServerEvent::AnnouncementDeleted {
            id: announcement.id,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_text() {
        assert_eq!(preview("short"), "short");
        let long = "x".repeat(PREVIEW_LEN + 10);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_LEN + 1);
        assert!(p.ends_with('…'));
    }
}
