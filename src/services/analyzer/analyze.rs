use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AnalyzerService;
use crate::models::{
    ApiResponse, analyzer::requests::AnalyzeRepositoryRequest,
    analyzer::responses::RepositoryReportResponse,
};
use crate::services::access::current_user;

pub async fn analyze_repository(
    service: &AnalyzerService,
    body: AnalyzeRepositoryRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let (report, cached) =
        try_response!(service.resolve_report(&body.repository, body.refresh, request).await);

    info!(
        "User {} analyzed repository {} (cached: {})",
        user.id, report.full_name, cached
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RepositoryReportResponse { report, cached },
        "Repository analyzed successfully",
    )))
}
