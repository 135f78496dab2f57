//! 私信存储操作

use super::{SeaOrmStorage, page_params};
use crate::entity::messages::{ActiveModel, Column, Entity as Messages};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    messages::{
        entities::Message,
        requests::{MessageBox, MessageListQuery, SendMessageRequest},
        responses::MessageListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_message_impl(
        &self,
        sender_id: i64,
        req: SendMessageRequest,
    ) -> Result<Message> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            sender_id: Set(sender_id),
            recipient_id: Set(req.recipient_id),
            subject: Set(req.subject),
            content: Set(req.content),
            is_read: Set(false),
            read_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建私信失败: {e}")))?;

        Ok(result.into_message())
    }

    pub async fn get_message_by_id_impl(&self, id: i64) -> Result<Option<Message>> {
        let result = Messages::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询私信失败: {e}")))?;

        Ok(result.map(|m| m.into_message()))
    }

    /// 收件箱 / 发件箱分页
    pub async fn list_messages_with_pagination_impl(
        &self,
        query: MessageListQuery,
    ) -> Result<MessageListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = match query.mailbox {
            MessageBox::Inbox => Messages::find().filter(Column::RecipientId.eq(query.user_id)),
            MessageBox::Outbox => Messages::find().filter(Column::SenderId.eq(query.user_id)),
        };

        if query.unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询私信总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询私信页数失败: {e}")))?;

        let messages = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询私信列表失败: {e}")))?;

        Ok(MessageListResponse {
            items: messages.into_iter().map(|m| m.into_message()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 标记已读；已读消息保持首次阅读时间
    pub async fn mark_message_read_impl(&self, id: i64) -> Result<Option<Message>> {
        let now = chrono::Utc::now().timestamp();

        Messages::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .col_expr(Column::ReadAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("标记私信已读失败: {e}")))?;

        self.get_message_by_id_impl(id).await
    }

    pub async fn delete_message_impl(&self, id: i64) -> Result<bool> {
        let result = Messages::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("删除私信失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
