pub mod attendance;
pub mod create;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ErrorCode,
    classes::entities::Class,
    enrollments::{
        entities::Enrollment,
        requests::{
            CreateEnrollmentRequest, EnrollmentQueryParams, RecordAttendanceRequest,
            UpdateEnrollmentRequest,
        },
    },
};
use crate::services::{ServiceError, classes::load_class};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        self.storage
            .clone()
            .unwrap_or_else(|| super::storage_from(request))
    }

    // 选课
    pub async fn enroll(
        &self,
        enroll_data: CreateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, create::enroll(self, enroll_data, request).await)
    }

    pub async fn list_enrollments(
        &self,
        query: EnrollmentQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, list::list_enrollments(self, query, request).await)
    }

    pub async fn get_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(request, get::get_enrollment(self, enrollment_id, request).await)
    }

    // 退课 / 结课
    pub async fn update_status(
        &self,
        enrollment_id: i64,
        update_data: UpdateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(
            request,
            update::update_status(self, enrollment_id, update_data, request).await,
        )
    }

    // 登记出勤
    pub async fn record_attendance(
        &self,
        enrollment_id: i64,
        attendance: RecordAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        super::respond(
            request,
            attendance::record_attendance(self, enrollment_id, attendance, request).await,
        )
    }
}

fn enrollment_not_found(enrollment_id: i64) -> ServiceError {
    ServiceError::not_found(
        ErrorCode::EnrollmentNotFound,
        format!("Enrollment {enrollment_id} not found"),
    )
}

/// 读取选课记录及其班级
pub(crate) async fn load_enrollment(
    storage: &Arc<dyn Storage>,
    enrollment_id: i64,
) -> Result<(Enrollment, Class), ServiceError> {
    let enrollment = storage
        .get_enrollment_by_id(enrollment_id)
        .await?
        .ok_or_else(|| enrollment_not_found(enrollment_id))?;
    let class = load_class(storage, enrollment.class_id).await?;
    Ok((enrollment, class))
}
