use actix_web::{HttpRequest, HttpResponse};

use super::{EnrollmentService, enrollment_not_found, load_enrollment};
use crate::errors::PortalError;
use crate::models::{
    ApiResponse,
    enrollments::{
        entities::{AttendanceEntry, EnrollmentStatus},
        requests::RecordAttendanceRequest,
    },
};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

const NOTE_MAX_LEN: usize = 500;

pub(crate) async fn record_attendance(
    service: &EnrollmentService,
    enrollment_id: i64,
    attendance: RecordAttendanceRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let (enrollment, class) = load_enrollment(&storage, enrollment_id).await?;
    policy::authorize(&actor, Resource::Attendance { class: &class }, Action::Create)?;

    if enrollment.status != EnrollmentStatus::Active {
        return Err(PortalError::validation(
            "Attendance can only be recorded for active enrollments",
        )
        .into());
    }
    if attendance
        .note
        .as_ref()
        .is_some_and(|note| note.chars().count() > NOTE_MAX_LEN)
    {
        return Err(PortalError::validation(format!(
            "note must be at most {NOTE_MAX_LEN} characters"
        ))
        .into());
    }

    let entry = AttendanceEntry {
        date: attendance.date,
        status: attendance.status,
        note: attendance.note,
        recorded_by: actor.user_id,
        recorded_at: chrono::Utc::now(),
    };

    let enrollment = storage
        .record_attendance(enrollment_id, entry)
        .await?
        .ok_or_else(|| enrollment_not_found(enrollment_id))?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        enrollment,
        "Attendance recorded successfully",
    )))
}
