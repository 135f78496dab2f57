use actix_web::{HttpRequest, HttpResponse};

use super::{ClassService, NAME_MAX_LEN, validate_capacity, validate_dates};
use crate::errors::PortalError;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::requests::CreateClassRequest,
    users::entities::UserRole,
};
use crate::policy::{self, Action, Resource};
use crate::services::{ServiceError, ServiceResult, current_actor};
use crate::utils::validate::validate_required_text;

pub(crate) async fn create_class(
    service: &ClassService,
    mut class_data: CreateClassRequest,
    request: &HttpRequest,
) -> ServiceResult {
    let actor = current_actor(request)?;

    // 教师为自己建班；管理员需指定授课教师
    let teacher_id = match class_data.teacher_id {
        Some(id) => id,
        None if actor.is_teacher() => actor.user_id,
        None => {
            return Err(PortalError::validation("teacher_id is required").into());
        }
    };
    policy::authorize(&actor, Resource::NewClass { teacher_id }, Action::Create)?;

    validate_required_text("name", &class_data.name, NAME_MAX_LEN)
        .map_err(PortalError::validation)?;
    validate_capacity(class_data.capacity)?;
    validate_dates(class_data.start_date, class_data.end_date)?;
    class_data.name = class_data.name.trim().to_string();

    let storage = service.get_storage(request);
    match storage.get_user_by_id(teacher_id).await? {
        Some(teacher) if teacher.role == UserRole::Teacher && teacher.is_active() => {}
        _ => {
            return Err(ServiceError::new(
                ErrorCode::ClassCreationFailed,
                PortalError::validation(format!("User {teacher_id} is not an active teacher")),
            ));
        }
    }

    let class = storage.create_class(teacher_id, class_data).await?;
    tracing::info!("Class {} created for teacher {}", class.id, teacher_id);

    Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created successfully")))
}
