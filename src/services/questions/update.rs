use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{
    QuestionService,
    validation::{invalidates_answers, merge_update},
};
use crate::models::{
    ApiResponse, ErrorCode,
    questions::{requests::UpdateQuestionRequest, responses::QuestionResponse},
};
use crate::services::access::{current_user, internal_error, load_evaluation};

fn question_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::QuestionNotFound,
        "Question not found",
    ))
}

pub async fn update_question(
    service: &QuestionService,
    question_id: i64,
    update: UpdateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);

    let existing = match storage.get_question_by_id(question_id).await {
        Ok(Some(question)) => question,
        Ok(None) => return Ok(question_not_found()),
        Err(e) => return Ok(internal_error("Failed to get question", e)),
    };
    try_response!(load_evaluation(&storage, &user, existing.evaluation_id).await);

    let draft = match merge_update(&existing, update) {
        Ok(draft) => draft,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::QuestionInvalid, msg)));
        }
    };

    if invalidates_answers(&existing, &draft) {
        match storage.count_answers_by_question(question_id).await {
            Ok(0) => {}
            Ok(count) => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::QuestionHasAnswers,
                    format!(
                        "Question already has {count} answer(s); its type and option count cannot change"
                    ),
                )));
            }
            Err(e) => return Ok(internal_error("Failed to count answers", e)),
        }
    }

    match storage.replace_question(question_id, draft).await {
        Ok(Some(question)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            QuestionResponse { question },
            "Question updated successfully",
        ))),
        Ok(None) => Ok(question_not_found()),
        Err(e) => Ok(internal_error("Question update failed", e)),
    }
}
