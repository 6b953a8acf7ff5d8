//! AI 内容生成：题目、教程、Mermaid 图

pub mod client;
pub mod diagram;
pub mod parser;
pub mod prompts;
pub mod questions;
pub mod tutorial;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::generators::requests::{
    ExportDiagramRequest, ExportTutorialRequest, GenerateDiagramRequest, GenerateQuestionsRequest,
    GenerateTutorialRequest, ImportQuestionsRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub use client::{GeminiClient, TextGenerator};

pub struct GeneratorService {
    storage: Option<Arc<dyn Storage>>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl GeneratorService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            generator: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 未注册生成器时返回 503
    pub(crate) fn get_generator(
        &self,
        request: &HttpRequest,
    ) -> Result<Arc<dyn TextGenerator>, HttpResponse> {
        if let Some(generator) = &self.generator {
            return Ok(generator.clone());
        }
        request
            .app_data::<web::Data<Arc<dyn TextGenerator>>>()
            .map(|data| data.get_ref().clone())
            .ok_or_else(|| {
                HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
                    ErrorCode::GeneratorNotConfigured,
                    "Text generator is not available",
                ))
            })
    }

    pub async fn generate_questions(
        &self,
        body: GenerateQuestionsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::generate_questions(self, body, request).await
    }

    pub async fn import_questions(
        &self,
        body: ImportQuestionsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::import_questions(self, body, request).await
    }

    pub async fn generate_tutorial(
        &self,
        body: GenerateTutorialRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        tutorial::generate_tutorial(self, body, request).await
    }

    pub async fn export_tutorial(&self, body: ExportTutorialRequest) -> ActixResult<HttpResponse> {
        tutorial::export_tutorial(body).await
    }

    pub async fn generate_diagram(
        &self,
        body: GenerateDiagramRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        diagram::generate_diagram(self, body, request).await
    }

    pub async fn export_diagram(&self, body: ExportDiagramRequest) -> ActixResult<HttpResponse> {
        diagram::export_diagram(body).await
    }
}
