use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttemptService;
use crate::models::{ApiResponse, attempts::responses::AttemptSubmissionsResponse};
use crate::services::access::{current_user, internal_error, load_attempt};

pub async fn list_submissions(
    service: &AttemptService,
    attempt_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    let (attempt, evaluation) = try_response!(load_attempt(&storage, &user, attempt_id).await);

    match storage.list_submission_summaries(attempt_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttemptSubmissionsResponse {
                attempt,
                total_questions: evaluation.question_count,
                items,
            },
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list submissions", e)),
    }
}
