use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{
    ExamService, already_submitted, grading::normalize_answer, load_own_submission,
    rules::check_answer,
};
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::{
        requests::{AnswerUpsert, SaveAnswerRequest},
        responses::AnswerResponse,
    },
};
use crate::services::access::{current_user, internal_error};
use crate::services::live::live_blocks;

pub async fn save_answer(
    service: &ExamService,
    submission_id: i64,
    body: SaveAnswerRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    let (submission, attempt) =
        try_response!(load_own_submission(&storage, &user, submission_id).await);

    let now = chrono::Utc::now().timestamp();
    let block = live_blocks().active_block(attempt.id, user.id, now);
    if let Err(refusal) = check_answer(&submission, attempt.status_now(), block) {
        return Ok(refusal.into_response());
    }

    let question = match storage.get_question_by_id(body.question_id).await {
        Ok(Some(question)) if question.evaluation_id == attempt.evaluation_id => question,
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::QuestionNotFound,
                "Question not found in this exam",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get question", e)),
    };

    let (answer_text, selected_options) =
        match normalize_answer(&question, body.answer_text, body.selected_options) {
            Ok(normalized) => normalized,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::AnswerInvalid, msg)));
            }
        };

    match storage
        .upsert_answer(AnswerUpsert {
            submission_id: submission.id,
            question_id: question.id,
            answer_text,
            selected_options,
        })
        .await
    {
        Ok(Some(answer)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AnswerResponse { answer },
            "Answer saved successfully",
        ))),
        // 检查之后答卷已被并发提交
        Ok(None) => Ok(already_submitted()),
        Err(e) => Ok(internal_error("Failed to save answer", e)),
    }
}
