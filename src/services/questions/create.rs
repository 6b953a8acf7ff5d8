use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{QuestionService, validation::build_draft};
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    questions::{requests::CreateQuestionRequest, responses::QuestionResponse},
};
use crate::services::access::{current_user, internal_error, load_evaluation};
use crate::storage::Storage;

/// 校验测评还能容纳 `adding` 道新题
pub(crate) async fn ensure_capacity(
    storage: &Arc<dyn Storage>,
    evaluation_id: i64,
    adding: usize,
) -> Result<(), HttpResponse> {
    let max = AppConfig::get().exam.max_questions_per_exam;
    let current = storage
        .count_questions_by_evaluation(evaluation_id)
        .await
        .map_err(|e| internal_error("Failed to count questions", e))?;

    if current + adding as u64 > max {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::QuestionInvalid,
            format!("An evaluation can hold at most {max} questions"),
        )));
    }
    Ok(())
}

pub async fn create_question(
    service: &QuestionService,
    evaluation_id: i64,
    body: CreateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));

    let draft = match build_draft(body) {
        Ok(draft) => draft,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::QuestionInvalid, msg)));
        }
    };

    let storage = service.get_storage(request);
    try_response!(load_evaluation(&storage, &user, evaluation_id).await);
    try_response!(ensure_capacity(&storage, evaluation_id, 1).await);

    match storage.create_questions(evaluation_id, vec![draft]).await {
        Ok(mut created) if !created.is_empty() => {
            let question = created.remove(0);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                QuestionResponse { question },
                "Question created successfully",
            )))
        }
        Ok(_) => Ok(internal_error("Question creation failed", "no rows inserted")),
        Err(e) => Ok(internal_error("Question creation failed", e)),
    }
}
