use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::common::ExportQuery;
use crate::models::evaluations::requests::{
    CreateEvaluationRequest, EvaluationListParams, UpdateEvaluationRequest,
};
use crate::models::questions::requests::CreateQuestionRequest;
use crate::models::users::entities::UserRole;
use crate::services::{EvaluationService, QuestionService};
use crate::utils::SafeIDI64;

static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);
static QUESTION_SERVICE: Lazy<QuestionService> = Lazy::new(QuestionService::new_lazy);

pub async fn list_evaluations(
    req: HttpRequest,
    query: web::Query<EvaluationListParams>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .list_evaluations(query.into_inner(), &req)
        .await
}

pub async fn create_evaluation(
    req: HttpRequest,
    body: web::Json<CreateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .create_evaluation(body.into_inner(), &req)
        .await
}

pub async fn get_evaluation(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.get_evaluation(evaluation_id.0, &req).await
}

pub async fn update_evaluation(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
    update: web::Json<UpdateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .update_evaluation(evaluation_id.0, update.into_inner(), &req)
        .await
}

pub async fn delete_evaluation(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .delete_evaluation(evaluation_id.0, &req)
        .await
}

pub async fn export_evaluation(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
    query: web::Query<ExportQuery>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .export_evaluation(evaluation_id.0, query.into_inner(), &req)
        .await
}

pub async fn list_questions(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.list_questions(evaluation_id.0, &req).await
}

pub async fn create_question(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
    body: web::Json<CreateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .create_question(evaluation_id.0, body.into_inner(), &req)
        .await
}

pub fn configure_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("", web::get().to(list_evaluations))
                    .route("", web::post().to(create_evaluation))
                    .route("/{id}", web::get().to(get_evaluation))
                    .route("/{id}", web::put().to(update_evaluation))
                    .route("/{id}", web::delete().to(delete_evaluation))
                    .route("/{id}/export", web::get().to(export_evaluation))
                    .route("/{id}/questions", web::get().to(list_questions))
                    .route("/{id}/questions", web::post().to(create_question)),
            ),
    );
}
