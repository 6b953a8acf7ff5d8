use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ExamService, rules::check_join};
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::{requests::JoinExamRequest, responses::JoinExamResponse},
};
use crate::services::access::{current_user, internal_error};
use crate::services::live::live_blocks;

pub async fn join_exam(
    service: &ExamService,
    body: JoinExamRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);

    let attempt = match storage.get_attempt_by_code(&body.code).await {
        Ok(Some(attempt)) => attempt,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ExamCodeInvalid,
                "Invalid access code",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to look up access code", e)),
    };

    let existing = match storage
        .get_submission_by_attempt_and_student(attempt.id, user.id)
        .await
    {
        Ok(existing) => existing,
        Err(e) => return Ok(internal_error("Failed to get submission", e)),
    };
    let now = chrono::Utc::now().timestamp();
    let block = live_blocks().active_block(attempt.id, user.id, now);
    if let Err(refusal) = check_join(existing.as_ref(), attempt.status_now(), block) {
        return Ok(refusal.into_response());
    }

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

    let (submission, resumed) = match existing {
        Some(submission) => (submission, true),
        None => match storage
            .create_submission(attempt.id, user.id, detail.max_score())
            .await
        {
            Ok((submission, created)) => {
                if created {
                    info!(
                        "Student {} joined attempt {} (submission {})",
                        user.id, attempt.id, submission.id
                    );
                }
                (submission, !created)
            }
            Err(e) => return Ok(internal_error("Failed to create submission", e)),
        },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        JoinExamResponse {
            submission,
            attempt,
            evaluation_title: detail.evaluation.title,
            resumed,
        },
        if resumed {
            "Exam resumed"
        } else {
            "Exam joined successfully"
        },
    )))
}
