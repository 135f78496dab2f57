//! 班级存储操作

use super::{SeaOrmStorage, page_params};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    classes::{
        entities::{Class, ClassStatus},
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    enrollments::entities::EnrollmentStatus,
    users::entities::User,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(
        &self,
        teacher_id: i64,
        req: CreateClassRequest,
    ) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            name: Set(req.name),
            description: Set(req.description),
            subject: Set(req.subject),
            capacity: Set(req.capacity),
            enrollment_count: Set(0),
            status: Set(ClassStatus::Active.to_string()),
            schedule: Set(req.schedule),
            start_date: Set(req.start_date.map(|d| d.timestamp())),
            end_date: Set(req.end_date.map(|d| d.timestamp())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Classes::find();

        // 教师筛选
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        if let Some(ref subject) = query.subject
            && !subject.trim().is_empty()
        {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询班级总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询班级页数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新班级信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        // 先检查班级是否存在
        let Some(existing) = self.get_class_by_id_impl(class_id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(subject) = update.subject {
            model.subject = Set(Some(subject));
        }

        if let Some(capacity) = update.capacity {
            if capacity < existing.enrollment_count {
                return Err(PortalError::conflict(format!(
                    "Capacity {capacity} is below the current enrollment count {}",
                    existing.enrollment_count
                )));
            }
            model.capacity = Set(capacity);
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if let Some(schedule) = update.schedule {
            model.schedule = Set(Some(schedule));
        }

        if let Some(start_date) = update.start_date {
            model.start_date = Set(Some(start_date.timestamp()));
        }

        if let Some(end_date) = update.end_date {
            model.end_date = Set(Some(end_date.timestamp()));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新班级失败: {e}")))?;

        self.get_class_by_id_impl(class_id).await
    }

    /// 删除班级
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 班级 active 学生 ID
    async fn active_student_ids(&self, class_id: i64) -> Result<Vec<i64>> {
        Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::StudentId)
            .filter(EnrollmentColumn::ClassId.eq(class_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询班级学生失败: {e}")))
    }

    /// 班级 active 学生
    pub async fn list_class_students_impl(&self, class_id: i64) -> Result<Vec<User>> {
        let student_ids = self.active_student_ids(class_id).await?;
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let students = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .order_by_asc(UserColumn::Username)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_user()).collect())
    }

    /// 班级成员 ID：教师 + active 学生
    pub async fn list_class_member_ids_impl(&self, class_id: i64) -> Result<Vec<i64>> {
        let Some(class) = self.get_class_by_id_impl(class_id).await? else {
            return Ok(Vec::new());
        };

        let mut members = vec![class.teacher_id];
        for id in self.active_student_ids(class_id).await? {
            if !members.contains(&id) {
                members.push(id);
            }
        }
        Ok(members)
    }

    /// 用户关联的班级 ID
    pub async fn list_user_class_ids_impl(&self, user_id: i64) -> Result<Vec<i64>> {
        let mut class_ids: Vec<i64> = Classes::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::TeacherId.eq(user_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询教师班级失败: {e}")))?;

        let enrolled: Vec<i64> = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::ClassId)
            .filter(EnrollmentColumn::StudentId.eq(user_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生班级失败: {e}")))?;

        for id in enrolled {
            if !class_ids.contains(&id) {
                class_ids.push(id);
            }
        }
        Ok(class_ids)
    }
}
