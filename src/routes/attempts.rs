use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attempts::requests::{
    AttemptListParams, CreateAttemptRequest, GradeAnswerRequest, UpdateAttemptRequest,
};
use crate::models::common::ExportQuery;
use crate::models::users::entities::UserRole;
use crate::services::AttemptService;
use crate::utils::SafeIDI64;

static ATTEMPT_SERVICE: Lazy<AttemptService> = Lazy::new(AttemptService::new_lazy);

pub async fn list_attempts(
    req: HttpRequest,
    query: web::Query<AttemptListParams>,
) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE.list_attempts(query.into_inner(), &req).await
}

pub async fn create_attempt(
    req: HttpRequest,
    body: web::Json<CreateAttemptRequest>,
) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE.create_attempt(body.into_inner(), &req).await
}

pub async fn get_attempt(req: HttpRequest, attempt_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE.get_attempt(attempt_id.0, &req).await
}

pub async fn update_attempt(
    req: HttpRequest,
    attempt_id: SafeIDI64,
    update: web::Json<UpdateAttemptRequest>,
) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE
        .update_attempt(attempt_id.0, update.into_inner(), &req)
        .await
}

pub async fn close_attempt(req: HttpRequest, attempt_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE.close_attempt(attempt_id.0, &req).await
}

pub async fn delete_attempt(req: HttpRequest, attempt_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE.delete_attempt(attempt_id.0, &req).await
}

pub async fn list_submissions(
    req: HttpRequest,
    attempt_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE.list_submissions(attempt_id.0, &req).await
}

pub async fn export_results(
    req: HttpRequest,
    attempt_id: SafeIDI64,
    query: web::Query<ExportQuery>,
) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE
        .export_results(attempt_id.0, query.into_inner(), &req)
        .await
}

pub async fn grade_answer(
    req: HttpRequest,
    answer_id: SafeIDI64,
    body: web::Json<GradeAnswerRequest>,
) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE
        .grade_answer(answer_id.0, body.into_inner(), &req)
        .await
}

pub fn configure_attempt_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attempts")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("", web::get().to(list_attempts))
                    .route("", web::post().to(create_attempt))
                    .route("/{id}", web::get().to(get_attempt))
                    .route("/{id}", web::put().to(update_attempt))
                    .route("/{id}", web::delete().to(delete_attempt))
                    .route("/{id}/close", web::post().to(close_attempt))
                    .route("/{id}/submissions", web::get().to(list_submissions))
                    .route("/{id}/export", web::get().to(export_results)),
            ),
    );
    // 人工评分
    cfg.service(
        web::scope("/api/v1/answers")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/{id}/grade", web::put().to(grade_answer)),
            ),
    );
}
