use actix_web::{HttpRequest, HttpResponse};

use super::{ClassService, load_class};
use crate::models::{ApiResponse, classes::responses::ClassRosterResponse};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceResult, current_actor};

pub(crate) async fn get_class(service: &ClassService, class_id: i64, request: &HttpRequest) -> ServiceResult {
    let actor = current_actor(request)?;
    let class = load_class(&service.get_storage(request), class_id).await?;
    policy::authorize(&actor, Resource::Class(&class), Action::Read)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Class retrieved successfully")))
}

pub(crate) async fn get_roster(
    service: &ClassService,
    class_id: i64,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;
    let storage = service.get_storage(request);
    let class = load_class(&storage, class_id).await?;
    policy::authorize(&actor, Resource::ClassRoster(&class), Action::Read)?;

    let teacher = storage.get_user_by_id(class.teacher_id).await?;
    let students = storage.list_class_students(class_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassRosterResponse {
            class_id,
            teacher,
            students,
        },
        "Class roster retrieved successfully",
    )))
}
