//! 选课存储操作
//!
//! 选课与状态变更在同一事务中完成容量检查，并按 active 记录重算班级人数，
//! 保证 `enrollment_count` 与 active 选课数一致。

use super::{SeaOrmStorage, page_params};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    classes::entities::ClassStatus,
    enrollments::{
        entities::{AttendanceEntry, Enrollment, EnrollmentStatus},
        requests::EnrollmentListQuery,
        responses::EnrollmentListResponse,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

/// 出勤追加的最大尝试次数
const MAX_APPEND_ATTEMPTS: usize = 16;

/// 按 active 选课记录重算班级人数
async fn recount_enrollments<C: ConnectionTrait>(conn: &C, class_id: i64, now: i64) -> Result<i32> {
    let active = Enrollments::find()
        .filter(Column::ClassId.eq(class_id))
        .filter(Column::Status.eq(EnrollmentStatus::Active.to_string()))
        .count(conn)
        .await
        .map_err(|e| PortalError::database_operation(format!("统计选课人数失败: {e}")))?;

    let count = i32::try_from(active).unwrap_or(i32::MAX);

    Classes::update_many()
        .col_expr(ClassColumn::EnrollmentCount, Expr::value(count))
        .col_expr(ClassColumn::UpdatedAt, Expr::value(now))
        .filter(ClassColumn::Id.eq(class_id))
        .exec(conn)
        .await
        .map_err(|e| PortalError::database_operation(format!("更新班级人数失败: {e}")))?;

    Ok(count)
}

impl SeaOrmStorage {
    /// 选课：班级必须存在且为 active，未满员；已退课的记录重新激活
    pub async fn enroll_student_impl(&self, class_id: i64, student_id: i64) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        // 锁定班级行（SELECT ... FOR UPDATE），同一班级的并发选课串行执行容量检查
        let class = Classes::find_by_id(class_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询班级失败: {e}")))?
            .ok_or_else(|| PortalError::not_found(format!("Class {class_id} not found")))?;

        if class.status != ClassStatus::Active.as_str() {
            return Err(PortalError::conflict(format!(
                "Class {class_id} is not accepting enrollments"
            )));
        }

        let existing = Enrollments::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询选课记录失败: {e}")))?;

        let existing_status = existing
            .as_ref()
            .map(|m| m.status.parse::<EnrollmentStatus>().unwrap_or(EnrollmentStatus::Active));
        match existing_status {
            Some(EnrollmentStatus::Active) => {
                return Err(PortalError::conflict(format!(
                    "Student {student_id} is already enrolled in class {class_id}"
                )));
            }
            Some(EnrollmentStatus::Completed) => {
                return Err(PortalError::conflict(format!(
                    "Student {student_id} has already completed class {class_id}"
                )));
            }
            _ => {}
        }

        let active = Enrollments::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .count(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计选课人数失败: {e}")))?;

        if active >= class.capacity.max(0) as u64 {
            return Err(PortalError::class_full(format!(
                "Class {class_id} has reached its capacity of {}",
                class.capacity
            )));
        }

        let saved = match existing {
            Some(row) => {
                let mut model: ActiveModel = row.into();
                model.status = Set(EnrollmentStatus::Active.to_string());
                model.enrolled_at = Set(now);
                model.dropped_at = Set(None);
                model.updated_at = Set(now);
                model
                    .update(&txn)
                    .await
                    .map_err(|e| PortalError::database_operation(format!("重新选课失败: {e}")))?
            }
            None => ActiveModel {
                class_id: Set(class_id),
                student_id: Set(student_id),
                status: Set(EnrollmentStatus::Active.to_string()),
                attendance: Set("[]".to_string()),
                enrolled_at: Set(now),
                dropped_at: Set(None),
                completed_at: Set(None),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建选课记录失败: {e}")))?,
        };

        recount_enrollments(&txn, class_id, now).await?;

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved.into_enrollment())
    }

    /// 通过 ID 获取选课记录
    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 分页列出选课记录
    pub async fn list_enrollments_with_pagination_impl(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Enrollments::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        if let Some(class_ids) = query.class_ids {
            if class_ids.is_empty() {
                return Ok(EnrollmentListResponse {
                    items: Vec::new(),
                    pagination: PaginationInfo::empty(page, size),
                });
            }
            select = select.filter(Column::ClassId.is_in(class_ids));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select.order_by_desc(Column::EnrolledAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询选课总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询选课页数失败: {e}")))?;

        let enrollments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询选课列表失败: {e}")))?;

        Ok(EnrollmentListResponse {
            items: enrollments
                .into_iter()
                .map(|m| m.into_enrollment())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 变更选课状态（active -> dropped / completed）
    pub async fn update_enrollment_status_impl(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(row) = Enrollments::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询选课记录失败: {e}")))?
        else {
            return Ok(None);
        };

        let current = row
            .status
            .parse::<EnrollmentStatus>()
            .unwrap_or(EnrollmentStatus::Active);
        if !current.can_transition_to(status) {
            return Err(PortalError::validation(format!(
                "Cannot change enrollment status from {current} to {status}"
            )));
        }

        let class_id = row.class_id;
        let mut model: ActiveModel = row.into();
        model.status = Set(status.to_string());
        model.updated_at = Set(now);
        match status {
            EnrollmentStatus::Dropped => model.dropped_at = Set(Some(now)),
            EnrollmentStatus::Completed => model.completed_at = Set(Some(now)),
            EnrollmentStatus::Active => {}
        }

        let saved = model
            .update(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新选课状态失败: {e}")))?;

        recount_enrollments(&txn, class_id, now).await?;

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(saved.into_enrollment()))
    }

    /// 追加出勤记录
    ///
    /// 出勤列表只增不减，以读取到的列表文本作为写入条件；
    /// 并发追加导致条件不成立时重新读取后重试，保证每次追加都被保留。
    pub async fn record_attendance_impl(
        &self,
        id: i64,
        entry: AttendanceEntry,
    ) -> Result<Option<Enrollment>> {
        for _ in 0..MAX_APPEND_ATTEMPTS {
            let Some(row) = Enrollments::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(|e| PortalError::database_operation(format!("查询选课记录失败: {e}")))?
            else {
                return Ok(None);
            };

            let read_attendance = row.attendance.clone();
            let mut enrollment = row.into_enrollment();
            enrollment.attendance.push(entry.clone());

            let result = Enrollments::update_many()
                .col_expr(
                    Column::Attendance,
                    Expr::value(serde_json::to_string(&enrollment.attendance)?),
                )
                .col_expr(
                    Column::UpdatedAt,
                    Expr::value(chrono::Utc::now().timestamp()),
                )
                .filter(Column::Id.eq(id))
                .filter(Column::Attendance.eq(read_attendance))
                .exec(&self.db)
                .await
                .map_err(|e| PortalError::database_operation(format!("记录出勤失败: {e}")))?;

            if result.rows_affected > 0 {
                return self.get_enrollment_by_id_impl(id).await;
            }
            debug!("Attendance of enrollment {} changed concurrently, retrying", id);
        }

        Err(PortalError::conflict(format!(
            "Attendance of enrollment {id} is being recorded concurrently, please retry"
        )))
    }
}
