//! 连接与房间注册表
//!
//! 每个 WebSocket 连接拥有一个无界发送通道；房间保存连接 ID 集合。
//! 投递是 fire-and-forget：已关闭的通道直接跳过。
//! 进程内唯一实例以 `web::Data<RelayHub>` 注入，HTTP 处理器与 WebSocket 会话共享。

use dashmap::DashMap;
use std::collections::HashSet;
use std::fmt;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;
use uuid::Uuid;

use crate::models::relay::events::ServerEvent;
use crate::models::users::entities::UserRole;

pub type ConnectionId = Uuid;

/// 广播房间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Room {
    User(i64),
    Role(UserRole),
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Room::User(id) => write!(f, "user:{id}"),
            Room::Role(role) => write!(f, "role:{role}"),
        }
    }
}

/// 投递目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// 所有连接（含未认证）
    Everyone,
    Room(Room),
    /// 指定用户的 user 房间
    Users(Vec<i64>),
}

struct Connection {
    sender: UnboundedSender<ServerEvent>,
    identity: Option<(i64, UserRole)>,
}

pub struct RelayHub {
    connections: DashMap<ConnectionId, Connection>,
    rooms: DashMap<Room, HashSet<ConnectionId>>,
}

impl Default for RelayHub {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayHub {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    /// 注册一个未认证的连接
    pub fn connect(&self) -> (ConnectionId, UnboundedReceiver<ServerEvent>) {
        let id = Uuid::new_v4();
        let (sender, receiver) = unbounded_channel();
        self.connections.insert(
            id,
            Connection {
                sender,
                identity: None,
            },
        );
        debug!("Relay connection {} registered", id);
        (id, receiver)
    }

    /// 绑定身份：离开旧身份的房间，加入 `user:<id>` 与 `role:<role>`
    pub fn authenticate(&self, id: ConnectionId, user_id: i64, role: UserRole) -> bool {
        let previous = match self.connections.get_mut(&id) {
            Some(mut conn) => conn.identity.replace((user_id, role)),
            None => return false,
        };

        if let Some((old_user, old_role)) = previous {
            self.leave(id, Room::User(old_user));
            self.leave(id, Room::Role(old_role));
        }
        self.join(id, Room::User(user_id));
        self.join(id, Room::Role(role));
        true
    }

    pub fn identity(&self, id: ConnectionId) -> Option<(i64, UserRole)> {
        self.connections.get(&id).and_then(|conn| conn.identity)
    }

    /// 清除身份并退出其房间，连接本身保留（可重新认证）
    pub fn deauthenticate(&self, id: ConnectionId) {
        let previous = self
            .connections
            .get_mut(&id)
            .and_then(|mut conn| conn.identity.take());

        if let Some((user_id, role)) = previous {
            self.leave(id, Room::User(user_id));
            self.leave(id, Room::Role(role));
        }
    }

    /// 移除连接并退出所有房间
    pub fn disconnect(&self, id: ConnectionId) {
        if let Some((_, conn)) = self.connections.remove(&id)
            && let Some((user_id, role)) = conn.identity
        {
            self.leave(id, Room::User(user_id));
            self.leave(id, Room::Role(role));
        }
        debug!("Relay connection {} removed", id);
    }

    fn join(&self, id: ConnectionId, room: Room) {
        self.rooms.entry(room).or_default().insert(id);
    }

    fn leave(&self, id: ConnectionId, room: Room) {
        self.rooms.remove_if_mut(&room, |_, members| {
            members.remove(&id);
            members.is_empty()
        });
    }

    /// 向单个连接发送
    pub fn send_to_connection(&self, id: ConnectionId, event: ServerEvent) -> bool {
        self.connections
            .get(&id)
            .is_some_and(|conn| conn.sender.send(event).is_ok())
    }

    pub fn send_to_room(&self, room: Room, event: &ServerEvent) -> usize {
        self.deliver(&[Target::Room(room)], event)
    }

    pub fn send_to_users(&self, user_ids: &[i64], event: &ServerEvent) -> usize {
        self.deliver(&[Target::Users(user_ids.to_vec())], event)
    }

    pub fn broadcast_all(&self, event: &ServerEvent) -> usize {
        self.deliver(&[Target::Everyone], event)
    }

    /// 向多个目标的并集投递，每个连接至多收到一次；返回成功投递的连接数
    pub fn deliver(&self, targets: &[Target], event: &ServerEvent) -> usize {
        let recipients = self.resolve(targets);
        recipients
            .into_iter()
            .filter(|id| self.send_to_connection(*id, event.clone()))
            .count()
    }

    fn resolve(&self, targets: &[Target]) -> HashSet<ConnectionId> {
        let mut ids = HashSet::new();
        for target in targets {
            match target {
                Target::Everyone => ids.extend(self.connections.iter().map(|c| *c.key())),
                Target::Room(room) => {
                    if let Some(members) = self.rooms.get(room) {
                        ids.extend(members.iter().copied());
                    }
                }
                Target::Users(user_ids) => {
                    for user_id in user_ids {
                        if let Some(members) = self.rooms.get(&Room::User(*user_id)) {
                            ids.extend(members.iter().copied());
                        }
                    }
                }
            }
        }
        ids
    }

    pub fn room_size(&self, room: Room) -> usize {
        self.rooms.get(&room).map_or(0, |members| members.len())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_online(&self, user_id: i64) -> bool {
        self.room_size(Room::User(user_id)) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_authenticate_joins_user_and_role_rooms() {
        let hub = RelayHub::new();
        let (conn, _rx) = hub.connect();
        assert!(hub.identity(conn).is_none());

        assert!(hub.authenticate(conn, 7, UserRole::Student));
        assert_eq!(hub.room_size(Room::User(7)), 1);
        assert_eq!(hub.room_size(Room::Role(UserRole::Student)), 1);
        assert!(hub.is_online(7));

        // 重新认证为其他身份时离开旧房间
        assert!(hub.authenticate(conn, 8, UserRole::Teacher));
        assert_eq!(hub.room_size(Room::User(7)), 0);
        assert_eq!(hub.room_size(Room::Role(UserRole::Student)), 0);
        assert_eq!(hub.room_size(Room::Role(UserRole::Teacher)), 1);
    }

    #[test]
    fn test_deauthenticate_keeps_connection() {
        let hub = RelayHub::new();
        let (conn, mut rx) = hub.connect();
        hub.authenticate(conn, 5, UserRole::Teacher);

        hub.deauthenticate(conn);
        assert!(hub.identity(conn).is_none());
        assert!(!hub.is_online(5));
        assert_eq!(hub.room_size(Room::Role(UserRole::Teacher)), 0);

        assert_eq!(hub.connection_count(), 1);
        assert!(hub.send_to_connection(conn, ServerEvent::Pong));
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[test]
    fn test_room_targeting() {
        let hub = RelayHub::new();
        let (student, mut student_rx) = hub.connect();
        let (teacher, mut teacher_rx) = hub.connect();
        let (_anon, mut anon_rx) = hub.connect();
        hub.authenticate(student, 1, UserRole::Student);
        hub.authenticate(teacher, 2, UserRole::Teacher);

        let delivered = hub.send_to_room(Room::Role(UserRole::Teacher), &ServerEvent::Pong);
        assert_eq!(delivered, 1);
        assert_eq!(drain(&mut teacher_rx).len(), 1);
        assert!(drain(&mut student_rx).is_empty());

        assert_eq!(hub.broadcast_all(&ServerEvent::Pong), 3);
        assert_eq!(drain(&mut anon_rx).len(), 1);
    }

    #[test]
    fn test_union_delivers_once() {
        let hub = RelayHub::new();
        let (conn, mut rx) = hub.connect();
        hub.authenticate(conn, 1, UserRole::Student);

        let targets = [
            Target::Room(Room::Role(UserRole::Student)),
            Target::Users(vec![1, 99]),
        ];
        assert_eq!(hub.deliver(&targets, &ServerEvent::Pong), 1);
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[test]
    fn test_closed_channels_are_skipped_and_disconnect_cleans_rooms() {
        let hub = RelayHub::new();
        let (gone, rx) = hub.connect();
        hub.authenticate(gone, 3, UserRole::Student);
        drop(rx);
        assert_eq!(hub.send_to_users(&[3], &ServerEvent::Pong), 0);

        hub.disconnect(gone);
        assert_eq!(hub.room_size(Room::User(3)), 0);
        assert_eq!(hub.connection_count(), 0);
        assert!(!hub.send_to_connection(gone, ServerEvent::Pong));
    }
}
