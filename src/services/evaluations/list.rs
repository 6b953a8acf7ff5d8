use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::{
    ApiResponse,
    evaluations::requests::{EvaluationListParams, EvaluationListQuery},
};
use crate::services::access::{current_user, internal_error};

pub async fn list_evaluations(
    service: &EvaluationService,
    query: EvaluationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);

    // 教师只能看到自己的测评
    let author_id = if user.is_admin() {
        query.author_id
    } else {
        Some(user.id)
    };

    let list_query = EvaluationListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
        author_id,
    };

    match storage.list_evaluations_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Evaluation list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve evaluation list", e)),
    }
}
