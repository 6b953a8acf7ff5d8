use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AttemptService, validate_window};
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    attempts::{requests::UpdateAttemptRequest, responses::AttemptResponse},
};
use crate::services::access::{current_user, internal_error, load_attempt};
use crate::utils::validate::normalize_optional_text;

fn attempt_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AttemptNotFound,
        "Attempt not found",
    ))
}

pub async fn update_attempt(
    service: &AttemptService,
    attempt_id: i64,
    mut update: UpdateAttemptRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    let (existing, _) = try_response!(load_attempt(&storage, &user, attempt_id).await);

    // 只改一端时与原值组合后校验
    let start = update.start_time.unwrap_or(existing.start_time).timestamp();
    let end = update.end_time.unwrap_or(existing.end_time).timestamp();
    if (update.start_time.is_some() || update.end_time.is_some())
        && let Err(msg) = validate_window(start, end, AppConfig::get().exam.max_window_hours)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AttemptWindowInvalid, msg)));
    }
    update.title = update.title.map(normalize_optional_text);

    match storage.update_attempt(attempt_id, update).await {
        Ok(Some(attempt)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttemptResponse { attempt },
            "Attempt updated successfully",
        ))),
        Ok(None) => Ok(attempt_not_found()),
        Err(e) => Ok(internal_error("Attempt update failed", e)),
    }
}

pub async fn close_attempt(
    service: &AttemptService,
    attempt_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    let (existing, _) = try_response!(load_attempt(&storage, &user, attempt_id).await);

    if existing.closed {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttemptResponse { attempt: existing },
            "Attempt is already closed",
        )));
    }

    let update = UpdateAttemptRequest {
        closed: Some(true),
        ..Default::default()
    };
    match storage.update_attempt(attempt_id, update).await {
        Ok(Some(attempt)) => {
            info!("Attempt {} closed by user {}", attempt_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AttemptResponse { attempt },
                "Attempt closed successfully",
            )))
        }
        Ok(None) => Ok(attempt_not_found()),
        Err(e) => Ok(internal_error("Failed to close attempt", e)),
    }
}
