use actix_web::{HttpRequest, HttpResponse};

use super::{EnrollmentService, load_enrollment};
use crate::models::ApiResponse;
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn get_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let (enrollment, class) = load_enrollment(&service.get_storage(request), enrollment_id).await?;
    policy::authorize(
        &actor,
        Resource::Enrollment {
            enrollment: &enrollment,
            class: &class,
        },
        Action::Read,
    )?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        enrollment,
        "Enrollment retrieved successfully",
    )))
}
