//! 课程模块存储操作

use super::{SeaOrmStorage, page_params};
use crate::entity::content_modules::{ActiveModel, Column, Entity as ContentModules, Model};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    content_modules::{
        entities::{ContentModule, validate_item_list},
        requests::{
            ContentModuleListQuery, CreateContentModuleRequest, UpdateContentModuleRequest,
        },
        responses::ContentModuleListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

/// 从模块条目列表中移除指定内容
///
/// `keep_class` 为 `Some` 时只处理其他班级的模块（内容迁移到该班级时使用）。
/// 返回被修改的模块数。
pub(super) async fn detach_item_from_modules<C: ConnectionTrait>(
    conn: &C,
    item_id: i64,
    keep_class: Option<i64>,
) -> Result<u64> {
    // items 是 JSON 文本，先用 LIKE 粗筛，再解析精确匹配
    let mut select = ContentModules::find().filter(Column::Items.contains(item_id.to_string()));
    if let Some(class_id) = keep_class {
        select = select.filter(Column::ClassId.ne(class_id));
    }
    let candidates = select
        .all(conn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询引用内容的模块失败: {e}")))?;

    let now = chrono::Utc::now().timestamp();
    let mut detached = 0;
    for row in candidates {
        let mut module = row.clone().into_content_module();
        if !module.remove_item(item_id) {
            continue;
        }

        let mut model: ActiveModel = row.into();
        model.items = Set(serde_json::to_string(&module.items)?);
        model.updated_at = Set(now);
        model
            .update(conn)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新模块条目失败: {e}")))?;
        detached += 1;
    }
    Ok(detached)
}

impl SeaOrmStorage {
    pub async fn create_content_module_impl(
        &self,
        created_by: i64,
        req: CreateContentModuleRequest,
    ) -> Result<ContentModule> {
        validate_item_list(&req.items).map_err(PortalError::validation)?;
        let now = chrono::Utc::now().timestamp();

        // 未指定位置时排在班级现有模块之后
        let position = match req.position {
            Some(p) => p,
            None => ContentModules::find()
                .filter(Column::ClassId.eq(req.class_id))
                .count(&self.db)
                .await
                .map_err(|e| PortalError::database_operation(format!("统计模块数量失败: {e}")))?
                .try_into()
                .unwrap_or(i32::MAX),
        };

        let model = ActiveModel {
            class_id: Set(req.class_id),
            title: Set(req.title),
            description: Set(req.description),
            items: Set(serde_json::to_string(&req.items)?),
            position: Set(position),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建模块失败: {e}")))?;

        Ok(result.into_content_module())
    }

    async fn find_module_row(&self, id: i64) -> Result<Option<Model>> {
        ContentModules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询模块失败: {e}")))
    }

    pub async fn get_content_module_by_id_impl(&self, id: i64) -> Result<Option<ContentModule>> {
        Ok(self
            .find_module_row(id)
            .await?
            .map(|m| m.into_content_module()))
    }

    pub async fn list_content_modules_with_pagination_impl(
        &self,
        query: ContentModuleListQuery,
    ) -> Result<ContentModuleListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = ContentModules::find();
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        select = select
            .order_by_asc(Column::ClassId)
            .order_by_asc(Column::Position)
            .order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询模块总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询模块页数失败: {e}")))?;

        let modules = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询模块列表失败: {e}")))?;

        Ok(ContentModuleListResponse {
            items: modules
                .into_iter()
                .map(|m| m.into_content_module())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 保存模块的条目列表及其它字段
    async fn save_module(&self, row: Model, module: ContentModule) -> Result<ContentModule> {
        let mut model: ActiveModel = row.into();
        model.title = Set(module.title);
        model.description = Set(module.description);
        model.position = Set(module.position);
        model.items = Set(serde_json::to_string(&module.items)?);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let saved = model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新模块失败: {e}")))?;

        Ok(saved.into_content_module())
    }

    pub async fn update_content_module_impl(
        &self,
        id: i64,
        update: UpdateContentModuleRequest,
    ) -> Result<Option<ContentModule>> {
        let Some(row) = self.find_module_row(id).await? else {
            return Ok(None);
        };
        let mut module = row.clone().into_content_module();

        if let Some(title) = update.title {
            module.title = title;
        }
        if let Some(description) = update.description {
            module.description = Some(description);
        }
        if let Some(position) = update.position {
            module.position = position;
        }
        if let Some(items) = update.items {
            module.reorder(items).map_err(PortalError::validation)?;
        }

        self.save_module(row, module).await.map(Some)
    }

    pub async fn add_content_module_item_impl(
        &self,
        id: i64,
        content_item_id: i64,
        position: Option<usize>,
    ) -> Result<Option<ContentModule>> {
        let Some(row) = self.find_module_row(id).await? else {
            return Ok(None);
        };
        let mut module = row.clone().into_content_module();
        module
            .insert_item(content_item_id, position)
            .map_err(PortalError::conflict)?;

        self.save_module(row, module).await.map(Some)
    }

    pub async fn remove_content_module_item_impl(
        &self,
        id: i64,
        content_item_id: i64,
    ) -> Result<Option<ContentModule>> {
        let Some(row) = self.find_module_row(id).await? else {
            return Ok(None);
        };
        let mut module = row.clone().into_content_module();
        if !module.remove_item(content_item_id) {
            return Err(PortalError::not_found(format!(
                "Content item {content_item_id} is not in module {id}"
            )));
        }

        self.save_module(row, module).await.map(Some)
    }

    pub async fn delete_content_module_impl(&self, id: i64) -> Result<bool> {
        let result = ContentModules::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("删除模块失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
