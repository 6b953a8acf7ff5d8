use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AreaService;
use crate::models::{
    ApiResponse, ErrorCode,
    areas::requests::{AreaListParams, AreaListQuery},
};

pub async fn list_areas(
    service: &AreaService,
    query: AreaListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = AreaListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
    };

    match storage.list_areas_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Area list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve area list: {e}"),
            )),
        ),
    }
}
