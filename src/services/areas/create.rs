use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AreaService;
use crate::models::{
    ApiResponse, ErrorCode,
    areas::{requests::CreateAreaRequest, responses::AreaResponse},
};
use crate::utils::validate::{normalize_optional_text, validate_area_name};

pub async fn create_area(
    service: &AreaService,
    mut area: CreateAreaRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    area.name = match validate_area_name(&area.name) {
        Ok(name) => name,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::AreaNameInvalid, msg)));
        }
    };
    area.description = normalize_optional_text(area.description);

    let storage = service.get_storage(request);

    match storage.create_area(area).await {
        Ok(area) => {
            info!("Area {} created", area.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                AreaResponse { area },
                "Area created successfully",
            )))
        }
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::AreaAlreadyExists, "Area name already exists"),
        )),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Area creation failed: {e}"),
            )),
        ),
    }
}
