use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::areas::requests::{AreaListParams, CreateAreaRequest, UpdateAreaRequest};
use crate::models::users::entities::UserRole;
use crate::services::AreaService;
use crate::utils::SafeIDI64;

static AREA_SERVICE: Lazy<AreaService> = Lazy::new(AreaService::new_lazy);

pub async fn list_areas(
    req: HttpRequest,
    query: web::Query<AreaListParams>,
) -> ActixResult<HttpResponse> {
    AREA_SERVICE.list_areas(query.into_inner(), &req).await
}

pub async fn get_area(req: HttpRequest, area_id: SafeIDI64) -> ActixResult<HttpResponse> {
    AREA_SERVICE.get_area(area_id.0, &req).await
}

pub async fn list_area_teachers(
    req: HttpRequest,
    area_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    AREA_SERVICE.list_area_teachers(area_id.0, &req).await
}

pub async fn create_area(
    req: HttpRequest,
    area: web::Json<CreateAreaRequest>,
) -> ActixResult<HttpResponse> {
    AREA_SERVICE.create_area(area.into_inner(), &req).await
}

pub async fn update_area(
    req: HttpRequest,
    area_id: SafeIDI64,
    update: web::Json<UpdateAreaRequest>,
) -> ActixResult<HttpResponse> {
    AREA_SERVICE
        .update_area(area_id.0, update.into_inner(), &req)
        .await
}

pub async fn delete_area(req: HttpRequest, area_id: SafeIDI64) -> ActixResult<HttpResponse> {
    AREA_SERVICE.delete_area(area_id.0, &req).await
}

pub fn configure_area_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/areas")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_areas)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_area)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/{id}", web::get().to(get_area))
                    .route("/{id}", web::put().to(update_area))
                    .route("/{id}", web::delete().to(delete_area))
                    .route("/{id}/teachers", web::get().to(list_area_teachers)),
            ),
    );
}
