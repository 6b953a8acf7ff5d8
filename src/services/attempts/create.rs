use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AttemptService, validate_window};
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    attempts::{
        requests::{CreateAttemptRequest, NewAttempt},
        responses::AttemptResponse,
    },
};
use crate::services::access::{current_user, internal_error, load_evaluation};
use crate::utils::validate::normalize_optional_text;

pub async fn create_attempt(
    service: &AttemptService,
    body: CreateAttemptRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let config = AppConfig::get();

    let start_time = body.start_time.timestamp();
    let end_time = body.end_time.timestamp();
    if let Err(msg) = validate_window(start_time, end_time, config.exam.max_window_hours) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AttemptWindowInvalid, msg)));
    }

    let storage = service.get_storage(request);
    let evaluation = try_response!(load_evaluation(&storage, &user, body.evaluation_id).await);

    match storage.count_questions_by_evaluation(evaluation.id).await {
        Ok(0) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::AttemptHasNoQuestions,
                "Evaluation has no questions",
            )));
        }
        Ok(_) => {}
        Err(e) => return Ok(internal_error("Failed to count questions", e)),
    }

    let new_attempt = NewAttempt {
        evaluation_id: evaluation.id,
        created_by: user.id,
        title: normalize_optional_text(body.title),
        start_time,
        end_time,
        code_length: config.exam.code_length,
    };

    match storage.create_attempt(new_attempt).await {
        Ok(attempt) => {
            info!(
                "Attempt {} created for evaluation {} with code {}",
                attempt.id, attempt.evaluation_id, attempt.code
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                AttemptResponse { attempt },
                "Attempt created successfully",
            )))
        }
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::InternalServerError().json(
            ApiResponse::error_empty(
                ErrorCode::AttemptCodeGenerationFailed,
                "Could not generate a unique access code, please retry",
            ),
        )),
        Err(e) => Ok(internal_error("Attempt creation failed", e)),
    }
}
