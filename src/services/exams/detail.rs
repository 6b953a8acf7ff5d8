use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExamService, load_own_submission};
use crate::models::{ApiResponse, ErrorCode, submissions::responses::ExamDetailResponse};
use crate::services::access::{current_user, internal_error};

pub async fn get_exam_detail(
    service: &ExamService,
    submission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    let (submission, attempt) =
        try_response!(load_own_submission(&storage, &user, submission_id).await);

    let detail = match storage.get_evaluation_detail(attempt.evaluation_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EvaluationNotFound,
                "Evaluation not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get evaluation", e)),
    };

    let answers = match storage.list_answers(submission.id).await {
        Ok(answers) => answers,
        Err(e) => return Ok(internal_error("Failed to list answers", e)),
    };

    let now = chrono::Utc::now().timestamp();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ExamDetailResponse {
            remaining_seconds: attempt.remaining_seconds(now),
            submission,
            attempt,
            evaluation_title: detail.evaluation.title,
            questions: detail
                .questions
                .into_iter()
                .map(|q| q.into_exam_question())
                .collect(),
            answers,
        },
        "Exam retrieved successfully",
    )))
}
