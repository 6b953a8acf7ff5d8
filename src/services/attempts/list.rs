use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttemptService;
use crate::models::{
    ApiResponse,
    attempts::requests::{AttemptListParams, AttemptListQuery},
};
use crate::services::access::{current_user, internal_error, load_evaluation};

pub async fn list_attempts(
    service: &AttemptService,
    query: AttemptListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);

    if let Some(evaluation_id) = query.evaluation_id {
        try_response!(load_evaluation(&storage, &user, evaluation_id).await);
    }

    let list_query = AttemptListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        evaluation_id: query.evaluation_id,
        author_id: if user.is_admin() { None } else { Some(user.id) },
        status: query.status,
    };

    match storage.list_attempts_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Attempt list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve attempt list", e)),
    }
}
