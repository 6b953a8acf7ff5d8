use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::{
    ApiResponse, ErrorCode,
    evaluations::{requests::UpdateEvaluationRequest, responses::EvaluationResponse},
};
use crate::services::access::{current_user, internal_error, load_evaluation};
use crate::utils::validate::{normalize_optional_text, validate_title};

pub async fn update_evaluation(
    service: &EvaluationService,
    evaluation_id: i64,
    mut update: UpdateEvaluationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));

    if let Some(ref title) = update.title {
        match validate_title(title) {
            Ok(title) => update.title = Some(title),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::EvaluationTitleInvalid, msg)));
            }
        }
    }
    update.description = update.description.map(normalize_optional_text);

    let storage = service.get_storage(request);
    try_response!(load_evaluation(&storage, &user, evaluation_id).await);

    match storage.update_evaluation(evaluation_id, update).await {
        Ok(Some(evaluation)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EvaluationResponse { evaluation },
            "Evaluation updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "Evaluation not found",
        ))),
        Err(e) => Ok(internal_error("Evaluation update failed", e)),
    }
}
