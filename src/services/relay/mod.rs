//! 实时中继：连接注册表、投递与 WebSocket 会话

pub mod dispatch;
pub mod hub;
pub mod session;

pub use hub::{ConnectionId, RelayHub, Room, Target};
pub use session::SessionContext;
