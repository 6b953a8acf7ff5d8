use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::analyzer::requests::{AnalyzeRepositoryRequest, ExportRepositoryRequest};
use crate::models::users::entities::UserRole;
use crate::services::AnalyzerService;

static ANALYZER_SERVICE: Lazy<AnalyzerService> = Lazy::new(AnalyzerService::new_lazy);

pub async fn analyze_repository(
    req: HttpRequest,
    body: web::Json<AnalyzeRepositoryRequest>,
) -> ActixResult<HttpResponse> {
    ANALYZER_SERVICE
        .analyze_repository(body.into_inner(), &req)
        .await
}

pub async fn export_repository(
    req: HttpRequest,
    body: web::Json<ExportRepositoryRequest>,
) -> ActixResult<HttpResponse> {
    ANALYZER_SERVICE
        .export_repository(body.into_inner(), &req)
        .await
}

pub fn configure_analyzer_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/analyzer")
            .wrap(middlewares::RateLimit::analyzer())
            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/repositories", web::post().to(analyze_repository))
            .route("/repositories/export", web::post().to(export_repository)),
    );
}
