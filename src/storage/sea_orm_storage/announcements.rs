//! 公告存储操作

use super::{SeaOrmStorage, page_params};
use crate::entity::announcements::{ActiveModel, Column, Entity as Announcements};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    announcements::{
        entities::{Announcement, Audience, Priority, TargetAudience},
        requests::{
            AnnouncementListQuery, CreateAnnouncementRequest, UpdateAnnouncementRequest,
            normalize_targets, validate_window,
        },
        responses::AnnouncementListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_announcement_impl(
        &self,
        author_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        Audience::resolve(req.target_audience, req.target_class_id, req.target_role)
            .map_err(PortalError::validation)?;
        validate_window(req.valid_from, req.valid_until).map_err(PortalError::validation)?;

        let now = chrono::Utc::now().timestamp();
        let (class_id, role) =
            normalize_targets(req.target_audience, req.target_class_id, req.target_role);

        let model = ActiveModel {
            author_id: Set(author_id),
            title: Set(req.title),
            content: Set(req.content),
            target_audience: Set(req.target_audience.to_string()),
            target_class_id: Set(class_id),
            target_role: Set(role.map(|r| r.to_string())),
            priority: Set(req.priority.unwrap_or(Priority::Normal).to_string()),
            valid_from: Set(req.valid_from.map(|t| t.timestamp())),
            valid_until: Set(req.valid_until.map(|t| t.timestamp())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建公告失败: {e}")))?;

        Ok(result.into_announcement())
    }

    pub async fn get_announcement_by_id_impl(&self, id: i64) -> Result<Option<Announcement>> {
        let result = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询公告失败: {e}")))?;

        Ok(result.map(|m| m.into_announcement()))
    }

    /// 分页列出公告；按查看者过滤可见范围，可选只取当前有效的公告
    pub async fn list_announcements_with_pagination_impl(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Announcements::find();

        if let Some(viewer) = query.viewer {
            let mut visible = Condition::any()
                .add(Column::TargetAudience.eq(TargetAudience::All.to_string()))
                .add(Column::AuthorId.eq(viewer.user_id))
                .add(
                    Condition::all()
                        .add(Column::TargetAudience.eq(TargetAudience::Role.to_string()))
                        .add(Column::TargetRole.eq(viewer.role.to_string())),
                );
            if !viewer.class_ids.is_empty() {
                visible = visible.add(
                    Condition::all()
                        .add(Column::TargetAudience.eq(TargetAudience::Class.to_string()))
                        .add(Column::TargetClassId.is_in(viewer.class_ids)),
                );
            }
            select = select.filter(visible);
        }

        if let Some(at) = query.active_at {
            let ts = at.timestamp();
            select = select
                .filter(
                    Condition::any()
                        .add(Column::ValidFrom.is_null())
                        .add(Column::ValidFrom.lte(ts)),
                )
                .filter(
                    Condition::any()
                        .add(Column::ValidUntil.is_null())
                        .add(Column::ValidUntil.gte(ts)),
                );
        }

        if let Some(priority) = query.priority {
            select = select.filter(Column::Priority.eq(priority.to_string()));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询公告总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询公告页数失败: {e}")))?;

        let announcements = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询公告列表失败: {e}")))?;

        Ok(AnnouncementListResponse {
            items: announcements
                .into_iter()
                .map(|m| m.into_announcement())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_announcement_impl(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>> {
        let Some(row) = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询公告失败: {e}")))?
        else {
            return Ok(None);
        };

        let merged = update.apply_to(row.clone().into_announcement());
        merged.audience().map_err(PortalError::validation)?;
        validate_window(merged.valid_from, merged.valid_until).map_err(PortalError::validation)?;

        let mut model: ActiveModel = row.into();
        model.title = Set(merged.title);
        model.content = Set(merged.content);
        model.target_audience = Set(merged.target_audience.to_string());
        model.target_class_id = Set(merged.target_class_id);
        model.target_role = Set(merged.target_role.map(|r| r.to_string()));
        model.priority = Set(merged.priority.to_string());
        model.valid_from = Set(merged.valid_from.map(|t| t.timestamp()));
        model.valid_until = Set(merged.valid_until.map(|t| t.timestamp()));
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let saved = model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新公告失败: {e}")))?;

        Ok(Some(saved.into_announcement()))
    }

    pub async fn delete_announcement_impl(&self, id: i64) -> Result<bool> {
        let result = Announcements::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("删除公告失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
