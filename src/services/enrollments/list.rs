use actix_web::{HttpRequest, HttpResponse};

use super::EnrollmentService;
use crate::models::{
    ApiResponse,
    enrollments::requests::{EnrollmentListQuery, EnrollmentQueryParams},
    users::entities::UserRole,
};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, classes::load_class, current_actor};

pub(crate) async fn list_enrollments(
    service: &EnrollmentService,
    query: EnrollmentQueryParams,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let mut list_query = EnrollmentListQuery::from(query);

    match actor.role {
        // 学生只能看到自己的选课
        UserRole::Student => list_query.student_id = Some(actor.user_id),
        // 教师只能看到自己班级的选课
        UserRole::Teacher => match list_query.class_id {
            Some(class_id) => {
                let class = load_class(&storage, class_id).await?;
                policy::authorize(&actor, Resource::ClassRoster(&class), Action::Read)?;
            }
            None => {
                list_query.class_ids = Some(storage.list_user_class_ids(actor.user_id).await?);
            }
        },
        UserRole::Admin => {}
    }

    let response = storage.list_enrollments_with_pagination(list_query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Enrollment list retrieved successfully",
    )))
}
