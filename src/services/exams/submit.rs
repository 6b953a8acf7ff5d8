use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{
    ExamService, already_submitted, grading::grade_submission, load_own_submission,
    rules::check_submit,
};
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::responses::SubmitExamResponse,
};
use crate::services::access::{current_user, internal_error};

/// 交卷。窗口关闭后仍允许提交，避免丢失已作答内容
pub async fn submit_exam(
    service: &ExamService,
    submission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    let (submission, attempt) =
        try_response!(load_own_submission(&storage, &user, submission_id).await);

    if let Err(refusal) = check_submit(&submission) {
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

    let answers = match storage.list_answers(submission.id).await {
        Ok(answers) => answers,
        Err(e) => return Ok(internal_error("Failed to list answers", e)),
    };

    let grades = grade_submission(&detail.questions, &answers);
    let graded_questions = grades.iter().filter(|g| g.score.is_some()).count() as i64;
    let pending_questions = grades.len() as i64 - graded_questions;
    let max_score = detail.max_score();

    match storage
        .finalize_submission(submission.id, grades, max_score)
        .await
    {
        Ok(Some(submission)) => {
            info!(
                "Submission {} submitted with score {:?}/{}",
                submission.id, submission.score, submission.max_score
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmitExamResponse {
                    submission,
                    graded_questions,
                    pending_questions,
                },
                "Exam submitted successfully",
            )))
        }
        Ok(None) => Ok(already_submitted()),
        Err(e) => Ok(internal_error("Failed to submit exam", e)),
    }
}
