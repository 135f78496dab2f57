use actix_web::{HttpRequest, HttpResponse};

use super::{EnrollmentService, enrollment_not_found, load_enrollment};
use crate::errors::PortalError;
use crate::models::{ApiResponse, ErrorCode, enrollments::requests::UpdateEnrollmentRequest};
use crate::policy;
use crate::services::{ServiceError, ServiceResult, current_actor};

pub(crate) async fn update_status(
    service: &EnrollmentService,
    enrollment_id: i64,
    update_data: UpdateEnrollmentRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let (enrollment, class) = load_enrollment(&storage, enrollment_id).await?;

    policy::check_enrollment_transition(&actor, &enrollment, &class, update_data.status).map_err(
        |e| match e {
            PortalError::Validation(_) => {
                ServiceError::new(ErrorCode::EnrollmentTransitionInvalid, e)
            }
            other => other.into(),
        },
    )?;

    // 存储层在事务内再次校验状态机并重算班级人数
    let enrollment = storage
        .update_enrollment_status(enrollment_id, update_data.status)
        .await
        .map_err(|e| match e {
            PortalError::Validation(_) => {
                ServiceError::new(ErrorCode::EnrollmentTransitionInvalid, e)
            }
            other => other.into(),
        })?
        .ok_or_else(|| enrollment_not_found(enrollment_id))?;

    tracing::info!(
        "Enrollment {} changed to {} by user {}",
        enrollment_id,
        enrollment.status,
        actor.user_id
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        enrollment,
        "Enrollment updated successfully",
    )))
}
