use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::content_items::requests::{
    ContentItemQueryParams, CreateContentItemRequest, UpdateContentItemRequest,
};
use crate::models::content_modules::requests::{
    AddModuleItemRequest, ContentModuleQueryParams, CreateContentModuleRequest,
    UpdateContentModuleRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{ContentItemService, ContentModuleService};
use crate::utils::{SafeIDI64, SafeItemIdI64};

static CONTENT_ITEM_SERVICE: Lazy<ContentItemService> = Lazy::new(ContentItemService::new_lazy);
static CONTENT_MODULE_SERVICE: Lazy<ContentModuleService> =
    Lazy::new(ContentModuleService::new_lazy);

pub async fn list_items(
    req: HttpRequest,
    query: web::Query<ContentItemQueryParams>,
) -> ActixResult<HttpResponse> {
    CONTENT_ITEM_SERVICE
        .list_items(query.into_inner(), &req)
        .await
}

pub async fn create_item(
    req: HttpRequest,
    item_data: web::Json<CreateContentItemRequest>,
) -> ActixResult<HttpResponse> {
    CONTENT_ITEM_SERVICE
        .create_item(item_data.into_inner(), &req)
        .await
}

pub async fn get_item(req: HttpRequest, item_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CONTENT_ITEM_SERVICE.get_item(item_id.0, &req).await
}

pub async fn list_versions(req: HttpRequest, item_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CONTENT_ITEM_SERVICE.list_versions(item_id.0, &req).await
}

pub async fn update_item(
    req: HttpRequest,
    item_id: SafeIDI64,
    update_data: web::Json<UpdateContentItemRequest>,
) -> ActixResult<HttpResponse> {
    CONTENT_ITEM_SERVICE
        .update_item(item_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_item(req: HttpRequest, item_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CONTENT_ITEM_SERVICE.delete_item(item_id.0, &req).await
}

pub async fn list_modules(
    req: HttpRequest,
    query: web::Query<ContentModuleQueryParams>,
) -> ActixResult<HttpResponse> {
    CONTENT_MODULE_SERVICE
        .list_modules(query.into_inner(), &req)
        .await
}

pub async fn create_module(
    req: HttpRequest,
    module_data: web::Json<CreateContentModuleRequest>,
) -> ActixResult<HttpResponse> {
    CONTENT_MODULE_SERVICE
        .create_module(module_data.into_inner(), &req)
        .await
}

pub async fn get_module(req: HttpRequest, module_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CONTENT_MODULE_SERVICE.get_module(module_id.0, &req).await
}

pub async fn update_module(
    req: HttpRequest,
    module_id: SafeIDI64,
    update_data: web::Json<UpdateContentModuleRequest>,
) -> ActixResult<HttpResponse> {
    CONTENT_MODULE_SERVICE
        .update_module(module_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_module(req: HttpRequest, module_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CONTENT_MODULE_SERVICE.delete_module(module_id.0, &req).await
}

pub async fn add_module_item(
    req: HttpRequest,
    module_id: SafeIDI64,
    item_data: web::Json<AddModuleItemRequest>,
) -> ActixResult<HttpResponse> {
    CONTENT_MODULE_SERVICE
        .add_item(module_id.0, item_data.into_inner(), &req)
        .await
}

pub async fn remove_module_item(
    req: HttpRequest,
    module_id: SafeIDI64,
    item_id: SafeItemIdI64,
) -> ActixResult<HttpResponse> {
    CONTENT_MODULE_SERVICE
        .remove_item(module_id.0, item_id.0, &req)
        .await
}

fn teacher_only() -> middlewares::RequireRole {
    middlewares::RequireRole::new_any(UserRole::teacher_roles())
}

// 配置路由
pub fn configure_content_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/content-items")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_items))
                    .route(web::post().to(create_item).wrap(teacher_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_item))
                    .route(web::put().to(update_item).wrap(teacher_only()))
                    .route(web::delete().to(delete_item).wrap(teacher_only())),
            )
            .service(web::resource("/{id}/versions").route(web::get().to(list_versions))),
    );

    cfg.service(
        web::scope("/api/v1/content-modules")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_modules))
                    .route(web::post().to(create_module).wrap(teacher_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_module))
                    .route(web::put().to(update_module).wrap(teacher_only()))
                    .route(web::delete().to(delete_module).wrap(teacher_only())),
            )
            .service(
                web::resource("/{id}/items")
                    .route(web::post().to(add_module_item).wrap(teacher_only())),
            )
            .service(
                web::resource("/{id}/items/{item_id}")
                    .route(web::delete().to(remove_module_item).wrap(teacher_only())),
            ),
    );
}
