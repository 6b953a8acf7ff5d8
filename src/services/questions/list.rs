use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionService;
use crate::models::{ApiResponse, questions::responses::QuestionListResponse};
use crate::services::access::{current_user, internal_error, load_evaluation};

pub async fn list_questions(
    service: &QuestionService,
    evaluation_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    try_response!(load_evaluation(&storage, &user, evaluation_id).await);

    match storage.list_questions(evaluation_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            QuestionListResponse { items },
            "Question list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list questions", e)),
    }
}
