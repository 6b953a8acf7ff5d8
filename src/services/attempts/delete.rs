use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttemptService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error, load_attempt};
use crate::services::live;

/// 删除场次，答卷与作答随之级联删除
pub async fn delete_attempt(
    service: &AttemptService,
    attempt_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    try_response!(load_attempt(&storage, &user, attempt_id).await);

    match storage.delete_attempt(attempt_id).await {
        Ok(true) => {
            live::clear_attempt(attempt_id);
            info!("Attempt {} deleted by user {}", attempt_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Attempt deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AttemptNotFound,
            "Attempt not found",
        ))),
        Err(e) => Ok(internal_error("Attempt deletion failed", e)),
    }
}
