use super::entities::{AttendanceStatus, EnrollmentStatus};
use crate::models::common::{PaginationQuery, deserialize_option_i64};
use serde::Deserialize;
use ts_rs::TS;

// 选课请求；学生省略 student_id 即为自己选课
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct CreateEnrollmentRequest {
    pub class_id: i64,
    pub student_id: Option<i64>,
}

// 选课列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct EnrollmentQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub student_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
}

// 选课状态变更请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct UpdateEnrollmentRequest {
    pub status: EnrollmentStatus,
}

// 出勤登记请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct RecordAttendanceRequest {
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

// 选课列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct EnrollmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    /// 仅返回这些班级中的记录（教师视角）
    pub class_ids: Option<Vec<i64>>,
    pub status: Option<EnrollmentStatus>,
}

impl From<EnrollmentQueryParams> for EnrollmentListQuery {
    fn from(params: EnrollmentQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            class_id: params.class_id,
            student_id: params.student_id,
            class_ids: None,
            status: params.status,
        }
    }
}
