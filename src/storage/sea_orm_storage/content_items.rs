//! 教学内容存储操作

use super::content_modules::detach_item_from_modules;
use super::{SeaOrmStorage, page_params};
use crate::entity::content_items::{ActiveModel, Column, Entity as ContentItems, Model};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    content_items::{
        entities::{ContentItem, ContentStatus},
        requests::{ContentItemListQuery, CreateContentItemRequest, UpdateContentItemRequest},
        responses::ContentItemListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

/// 乐观并发写入的最大尝试次数
const MAX_UPDATE_ATTEMPTS: usize = 16;

impl SeaOrmStorage {
    /// 创建内容，版本号从 1 开始
    pub async fn create_content_item_impl(
        &self,
        author_id: i64,
        req: CreateContentItemRequest,
    ) -> Result<ContentItem> {
        let now = chrono::Utc::now().timestamp();
        let status = req.status.unwrap_or(ContentStatus::Draft);
        let published_at = (status == ContentStatus::Published).then_some(now);

        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            content_type: Set(req.content_type.to_string()),
            content: Set(req.content),
            class_id: Set(req.class_id),
            author_id: Set(author_id),
            status: Set(status.to_string()),
            version: Set(1),
            previous_versions: Set("[]".to_string()),
            tags: Set(serde_json::to_string(&req.tags)?),
            published_at: Set(published_at),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建内容失败: {e}")))?;

        Ok(result.into_content_item())
    }

    /// 通过 ID 获取内容
    pub async fn get_content_item_by_id_impl(&self, id: i64) -> Result<Option<ContentItem>> {
        let result = ContentItems::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询内容失败: {e}")))?;

        Ok(result.map(|m| m.into_content_item()))
    }

    /// 分页列出内容
    pub async fn list_content_items_with_pagination_impl(
        &self,
        query: ContentItemListQuery,
    ) -> Result<ContentItemListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = ContentItems::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        if let Some(author_id) = query.author_id {
            select = select.filter(Column::AuthorId.eq(author_id));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(content_type) = query.content_type {
            select = select.filter(Column::ContentType.eq(content_type.to_string()));
        }

        // 非作者只能看到已发布内容
        if let Some(viewer_id) = query.visible_to {
            select = select.filter(
                Condition::any()
                    .add(Column::Status.eq(ContentStatus::Published.to_string()))
                    .add(Column::AuthorId.eq(viewer_id)),
            );
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.contains(&escaped))
                    .add(Column::Description.contains(&escaped))
                    .add(Column::Tags.contains(&escaped)),
            );
        }

        select = select.order_by_desc(Column::UpdatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询内容总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询内容页数失败: {e}")))?;

        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询内容列表失败: {e}")))?;

        Ok(ContentItemListResponse {
            items: items.into_iter().map(|m| m.into_content_item()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新内容；携带正文时旧正文进入历史并递增版本号
    ///
    /// 以读取到的版本号作为写入条件，只写入本次修改的列；
    /// 并发修改导致条件不成立时重新读取后重试。
    pub async fn update_content_item_impl(
        &self,
        id: i64,
        editor_id: i64,
        update: UpdateContentItemRequest,
    ) -> Result<Option<ContentItem>> {
        for _ in 0..MAX_UPDATE_ATTEMPTS {
            let Some(row) = ContentItems::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(|e| PortalError::database_operation(format!("查询内容失败: {e}")))?
            else {
                return Ok(None);
            };

            let read_version = row.version;
            let previous_class = row.class_id;
            let model = revised_model(row, editor_id, &update)?;

            // 迁移到其他班级时需要同时清理原班级模块
            let moved_to = update.class_id.filter(|c| previous_class != Some(*c));
            let applied = match moved_to {
                Some(class_id) => self.write_and_detach(id, read_version, model, class_id).await?,
                None => write_if_version(&self.db, id, read_version, model).await?,
            };

            if applied {
                return self.get_content_item_by_id_impl(id).await;
            }
            debug!("Content item {} changed concurrently, retrying update", id);
        }

        Err(PortalError::conflict(format!(
            "Content item {id} is being edited concurrently, please retry"
        )))
    }

    /// 写入更新并从其他班级的模块中移除该内容（同一事务）
    async fn write_and_detach(
        &self,
        id: i64,
        read_version: i32,
        model: ActiveModel,
        class_id: i64,
    ) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let applied = write_if_version(&txn, id, read_version, model).await?;
        if applied {
            detach_item_from_modules(&txn, id, Some(class_id)).await?;
        }

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(applied)
    }

    /// 删除内容，并在同一事务内从引用它的模块中移除
    pub async fn delete_content_item_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let result = ContentItems::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("删除内容失败: {e}")))?;

        if result.rows_affected > 0 {
            detach_item_from_modules(&txn, id, None).await?;
        }

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

/// 根据更新请求生成只包含变更列的 ActiveModel
fn revised_model(
    row: Model,
    editor_id: i64,
    update: &UpdateContentItemRequest,
) -> Result<ActiveModel> {
    let now = chrono::Utc::now();
    let mut item = row.into_content_item();
    let mut model = ActiveModel {
        updated_at: Set(now.timestamp()),
        ..Default::default()
    };

    if let Some(title) = &update.title {
        model.title = Set(title.clone());
    }
    if let Some(description) = &update.description {
        model.description = Set(Some(description.clone()));
    }
    if let Some(content_type) = update.content_type {
        model.content_type = Set(content_type.to_string());
    }
    if let Some(class_id) = update.class_id {
        model.class_id = Set(Some(class_id));
    }
    if let Some(tags) = &update.tags {
        model.tags = Set(serde_json::to_string(tags)?);
    }
    if let Some(content) = &update.content {
        item.revise(content.clone(), editor_id, now);
        model.content = Set(item.content.clone());
        model.version = Set(item.version);
        model.previous_versions = Set(serde_json::to_string(&item.previous_versions)?);
    }
    if let Some(status) = update.status {
        item.set_status(status, now);
        model.status = Set(item.status.to_string());
        model.published_at = Set(item.published_at.map(|t| t.timestamp()));
    }

    Ok(model)
}

/// 仅当版本号未变化时写入，返回是否写入成功
async fn write_if_version<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    read_version: i32,
    model: ActiveModel,
) -> Result<bool> {
    let result = ContentItems::update_many()
        .set(model)
        .filter(Column::Id.eq(id))
        .filter(Column::Version.eq(read_version))
        .exec(conn)
        .await
        .map_err(|e| PortalError::database_operation(format!("更新内容失败: {e}")))?;

    Ok(result.rows_affected > 0)
}
