use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AreaService;
use crate::models::{
    ApiResponse, ErrorCode,
    areas::responses::{AreaResponse, AreaTeachersResponse},
};

fn area_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AreaNotFound,
        "Area not found",
    ))
}

pub async fn get_area(
    service: &AreaService,
    area_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_area_by_id(area_id).await {
        Ok(Some(area)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AreaResponse { area },
            "Area retrieved successfully",
        ))),
        Ok(None) => Ok(area_not_found()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get area: {e}"),
            )),
        ),
    }
}

pub async fn list_area_teachers(
    service: &AreaService,
    area_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let area = match storage.get_area_by_id(area_id).await {
        Ok(Some(area)) => area,
        Ok(None) => return Ok(area_not_found()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get area: {e}"),
                )),
            );
        }
    };

    match storage.list_area_teachers(area_id).await {
        Ok(teachers) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AreaTeachersResponse { area, teachers },
            "Area teachers retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list area teachers: {e}"),
            )),
        ),
    }
}
