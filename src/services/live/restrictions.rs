use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{LiveService, live_blocks};
use crate::models::{
    ApiResponse, ErrorCode,
    live::{
        requests::BlockUserRequest,
        responses::{UserBlockListResponse, UserBlockResponse},
    },
};
use crate::services::access::{current_user, internal_error, load_attempt};
use crate::utils::validate::normalize_optional_text;

const MAX_REASON_CHARS: usize = 500;

pub async fn block_user(
    service: &LiveService,
    attempt_id: i64,
    body: BlockUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));

    if let Some(duration) = body.duration_secs
        && duration <= 0
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Block duration must be greater than zero",
        )));
    }
    let reason = normalize_optional_text(body.reason);
    if reason
        .as_ref()
        .is_some_and(|r| r.chars().count() > MAX_REASON_CHARS)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Block reason cannot exceed {MAX_REASON_CHARS} characters"),
        )));
    }

    let storage = service.get_storage(request);
    try_response!(load_attempt(&storage, &user, attempt_id).await);

    match storage.get_user_by_id(body.user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get user", e)),
    }

    let now = chrono::Utc::now().timestamp();
    let block = live_blocks().block(
        attempt_id,
        body.user_id,
        reason,
        user.id,
        body.duration_secs,
        now,
    );
    info!(
        "User {} blocked in attempt {} by {}",
        block.user_id, attempt_id, user.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        UserBlockResponse { block },
        "User blocked successfully",
    )))
}

pub async fn unblock_user(
    service: &LiveService,
    attempt_id: i64,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    try_response!(load_attempt(&storage, &user, attempt_id).await);

    match live_blocks().unblock(attempt_id, user_id) {
        Some(_) => {
            info!("User {user_id} unblocked in attempt {attempt_id}");
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User unblocked successfully")))
        }
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::LiveBlockNotFound,
            "Block not found",
        ))),
    }
}

pub async fn list_blocks(
    service: &LiveService,
    attempt_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    try_response!(load_attempt(&storage, &user, attempt_id).await);

    let items = live_blocks().list(attempt_id, chrono::Utc::now().timestamp());
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserBlockListResponse { items },
        "Blocks retrieved successfully",
    )))
}
