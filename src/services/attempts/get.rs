use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttemptService;
use crate::models::{ApiResponse, attempts::responses::AttemptResponse};
use crate::services::access::{current_user, load_attempt};

pub async fn get_attempt(
    service: &AttemptService,
    attempt_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    let (attempt, _) = try_response!(load_attempt(&storage, &user, attempt_id).await);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttemptResponse { attempt },
        "Attempt retrieved successfully",
    )))
}
