use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::generators::requests::{
    ExportDiagramRequest, ExportTutorialRequest, GenerateDiagramRequest, GenerateQuestionsRequest,
    GenerateTutorialRequest, ImportQuestionsRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::GeneratorService;

static GENERATOR_SERVICE: Lazy<GeneratorService> = Lazy::new(GeneratorService::new_lazy);

pub async fn generate_questions(
    req: HttpRequest,
    body: web::Json<GenerateQuestionsRequest>,
) -> ActixResult<HttpResponse> {
    GENERATOR_SERVICE
        .generate_questions(body.into_inner(), &req)
        .await
}

pub async fn import_questions(
    req: HttpRequest,
    body: web::Json<ImportQuestionsRequest>,
) -> ActixResult<HttpResponse> {
    GENERATOR_SERVICE
        .import_questions(body.into_inner(), &req)
        .await
}

pub async fn generate_tutorial(
    req: HttpRequest,
    body: web::Json<GenerateTutorialRequest>,
) -> ActixResult<HttpResponse> {
    GENERATOR_SERVICE
        .generate_tutorial(body.into_inner(), &req)
        .await
}

pub async fn export_tutorial(body: web::Json<ExportTutorialRequest>) -> ActixResult<HttpResponse> {
    GENERATOR_SERVICE.export_tutorial(body.into_inner()).await
}

pub async fn generate_diagram(
    req: HttpRequest,
    body: web::Json<GenerateDiagramRequest>,
) -> ActixResult<HttpResponse> {
    GENERATOR_SERVICE
        .generate_diagram(body.into_inner(), &req)
        .await
}

pub async fn export_diagram(body: web::Json<ExportDiagramRequest>) -> ActixResult<HttpResponse> {
    GENERATOR_SERVICE.export_diagram(body.into_inner()).await
}

pub fn configure_generator_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/generators")
            // 先认证再限流，计数键为用户 ID
            .wrap(middlewares::RateLimit::generator())
            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/questions", web::post().to(generate_questions))
            .route("/questions/import", web::post().to(import_questions))
            .route("/tutorials", web::post().to(generate_tutorial))
            .route("/tutorials/export", web::post().to(export_tutorial))
            .route("/diagrams", web::post().to(generate_diagram))
            .route("/diagrams/export", web::post().to(export_diagram)),
    );
}
