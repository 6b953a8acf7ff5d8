use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::ReportService;
use crate::utils::SafeIDI64;

static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.overview(&req).await
}

pub async fn evaluation_report(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.evaluation_report(evaluation_id.0, &req).await
}

pub async fn attempt_report(req: HttpRequest, attempt_id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.attempt_report(attempt_id.0, &req).await
}

pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/overview", web::get().to(overview))
                    .route("/evaluations/{id}", web::get().to(evaluation_report))
                    .route("/attempts/{id}", web::get().to(attempt_report)),
            ),
    );
}
