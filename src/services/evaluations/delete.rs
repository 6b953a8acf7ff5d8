use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EvaluationService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error, load_evaluation};

fn has_attempts() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::EvaluationHasAttempts,
        "Evaluation still has attempts and cannot be deleted",
    ))
}

pub async fn delete_evaluation(
    service: &EvaluationService,
    evaluation_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);

    try_response!(load_evaluation(&storage, &user, evaluation_id).await);

    match storage.count_attempts_by_evaluation(evaluation_id).await {
        Ok(0) => {}
        Ok(_) => return Ok(has_attempts()),
        Err(e) => return Ok(internal_error("Failed to count attempts", e)),
    }

    match storage.delete_evaluation(evaluation_id).await {
        Ok(true) => {
            info!("Evaluation {} deleted by user {}", evaluation_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Evaluation deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "Evaluation not found",
        ))),
        Err(e) if e.is_foreign_key_violation() => Ok(has_attempts()),
        Err(e) => Ok(internal_error("Evaluation deletion failed", e)),
    }
}
