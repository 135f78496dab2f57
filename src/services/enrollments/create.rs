use actix_web::{HttpRequest, HttpResponse};

use super::EnrollmentService;
use crate::errors::PortalError;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::entities::ClassStatus,
    enrollments::requests::CreateEnrollmentRequest,
    users::entities::UserRole,
};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceError, ServiceResult, classes::load_class, current_actor};

pub(crate) async fn enroll(
    service: &EnrollmentService,
    enroll_data: CreateEnrollmentRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);

    // 学生省略 student_id 即为自己选课
    let student_id = match enroll_data.student_id {
        Some(id) => id,
        None if actor.role == UserRole::Student => actor.user_id,
        None => return Err(PortalError::validation("student_id is required").into()),
    };

    let class = load_class(&storage, enroll_data.class_id).await?;
    policy::authorize(
        &actor,
        Resource::NewEnrollment {
            class: &class,
            student_id,
        },
        Action::Create,
    )?;

    match storage.get_user_by_id(student_id).await? {
        Some(student) if student.role == UserRole::Student && student.is_active() => {}
        _ => {
            return Err(PortalError::validation(format!(
                "User {student_id} is not an active student"
            ))
            .into());
        }
    }

    let enrollment = storage
        .enroll_student(class.id, student_id)
        .await
        .map_err(|e| match e {
            PortalError::Conflict(_) if class.status != ClassStatus::Active => {
                ServiceError::new(ErrorCode::EnrollmentClassInactive, e)
            }
            PortalError::Conflict(_) => ServiceError::new(ErrorCode::EnrollmentAlreadyActive, e),
            other => other.into(),
        })?;

    tracing::info!(
        "Student {} enrolled in class {} (enrollment {})",
        student_id,
        class.id,
        enrollment.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        enrollment,
        "Enrolled successfully",
    )))
}
