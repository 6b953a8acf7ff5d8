use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::submissions::requests::{JoinExamRequest, PollParams, SaveAnswerRequest};
use crate::models::users::entities::UserRole;
use crate::services::ExamService;
use crate::utils::SafeIDI64;

static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

pub async fn join_exam(
    req: HttpRequest,
    body: web::Json<JoinExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.join(body.into_inner(), &req).await
}

pub async fn get_exam(req: HttpRequest, submission_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.get_detail(submission_id.0, &req).await
}

pub async fn save_answer(
    req: HttpRequest,
    submission_id: SafeIDI64,
    body: web::Json<SaveAnswerRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .save_answer(submission_id.0, body.into_inner(), &req)
        .await
}

pub async fn submit_exam(
    req: HttpRequest,
    submission_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.submit(submission_id.0, &req).await
}

pub async fn poll_exam(
    req: HttpRequest,
    submission_id: SafeIDI64,
    query: web::Query<PollParams>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .poll(submission_id.0, query.into_inner(), &req)
        .await
}

pub fn configure_exam_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exam")
            // 限流按已认证用户计数，需在 JWT 之后执行
            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/join")
                    .wrap(middlewares::RateLimit::exam_join())
                    .route(web::post().to(join_exam)),
            )
            .route("/submissions/{id}", web::get().to(get_exam))
            .route("/submissions/{id}/answers", web::put().to(save_answer))
            .route("/submissions/{id}/submit", web::post().to(submit_exam))
            .route("/submissions/{id}/poll", web::get().to(poll_exam)),
    );
}
