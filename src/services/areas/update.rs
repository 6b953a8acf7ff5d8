use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AreaService;
use crate::models::{
    ApiResponse, ErrorCode,
    areas::{requests::UpdateAreaRequest, responses::AreaResponse},
};
use crate::utils::validate::{normalize_optional_text, validate_area_name};

pub async fn update_area(
    service: &AreaService,
    area_id: i64,
    mut update: UpdateAreaRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref name) = update.name {
        match validate_area_name(name) {
            Ok(name) => update.name = Some(name),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::AreaNameInvalid, msg)));
            }
        }
    }
    update.description = update.description.map(normalize_optional_text);

    let storage = service.get_storage(request);

    match storage.update_area(area_id, update).await {
        Ok(Some(area)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AreaResponse { area },
            "Area updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AreaNotFound,
            "Area not found",
        ))),
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::AreaAlreadyExists, "Area name already exists"),
        )),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Area update failed: {e}"),
            )),
        ),
    }
}
