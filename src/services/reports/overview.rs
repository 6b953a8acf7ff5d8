use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReportService;
use crate::models::ApiResponse;
use crate::services::access::{current_user, internal_error};

/// 管理员看到全站数据，教师只统计自己的测评
pub async fn overview_report(
    service: &ReportService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);

    let scope = if user.is_admin() { None } else { Some(user.id) };

    match storage.overview_report(scope).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            report,
            "Overview report generated successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to generate overview report", e)),
    }
}
