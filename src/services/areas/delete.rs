use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AreaService;
use crate::models::{ApiResponse, ErrorCode};

fn area_in_use(count: u64) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::AreaInUse,
        format!("Area is still referenced by {count} user(s)"),
    ))
}

pub async fn delete_area(
    service: &AreaService,
    area_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.count_users_in_area(area_id).await {
        Ok(0) => {}
        Ok(count) => return Ok(area_in_use(count)),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to check area usage: {e}"),
                )),
            );
        }
    }

    match storage.delete_area(area_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Area deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AreaNotFound,
            "Area not found",
        ))),
        // 并发插入引用时由外键兜底
        Err(e) if e.is_foreign_key_violation() => Ok(area_in_use(1)),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Area deletion failed: {e}"),
            )),
        ),
    }
}
