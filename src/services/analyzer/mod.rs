//! 代码仓库贡献度分析

pub mod analyze;
pub mod export;
pub mod github;
pub mod input;
pub mod report;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::debug;

use crate::cache::{ObjectCache, get_json, insert_json};
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    analyzer::{
        entities::RepositoryReport,
        requests::{AnalyzeRepositoryRequest, ExportRepositoryRequest},
    },
};
use crate::services::access::external_error;

pub use github::{GitHubClient, RepositorySource};

pub struct AnalyzerService {
    source: Option<Arc<dyn RepositorySource>>,
}

impl AnalyzerService {
    pub fn new_lazy() -> Self {
        Self { source: None }
    }

    pub(crate) fn get_source(
        &self,
        request: &HttpRequest,
    ) -> Result<Arc<dyn RepositorySource>, HttpResponse> {
        if let Some(source) = &self.source {
            return Ok(source.clone());
        }
        request
            .app_data::<web::Data<Arc<dyn RepositorySource>>>()
            .map(|data| data.get_ref().clone())
            .ok_or_else(|| {
                HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
                    ErrorCode::AnalyzerUpstreamError,
                    "Repository analyzer is not available",
                ))
            })
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        request
            .app_data::<web::Data<Arc<dyn ObjectCache>>>()
            .map(|cache| cache.get_ref().clone())
    }

    /// 解析仓库地址，优先读缓存，返回报告及是否命中缓存
    pub(crate) async fn resolve_report(
        &self,
        repository: &str,
        refresh: bool,
        request: &HttpRequest,
    ) -> Result<(RepositoryReport, bool), HttpResponse> {
        let target = input::parse_repository(repository).map_err(|msg| {
            HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::RepositoryInvalid, msg))
        })?;
        let key = target.cache_key();
        let cache = self.get_cache(request);

        if !refresh && let Some(cache) = &cache {
            if let Some(report) = get_json::<RepositoryReport>(cache.as_ref(), &key).await {
                debug!("Analyzer cache hit for {}", key);
                return Ok((report, true));
            }
        }

        let source = self.get_source(request)?;
        let snapshot = source
            .fetch(&target.owner, &target.repo)
            .await
            .map_err(|e| external_error(&e, ErrorCode::AnalyzerUpstreamError))?;
        let report = report::build_report(snapshot, chrono::Utc::now());

        if let Some(cache) = &cache {
            let ttl = AppConfig::get().github.report_ttl_secs;
            insert_json(cache.as_ref(), &key, &report, ttl).await;
        }

        Ok((report, false))
    }

    pub async fn analyze_repository(
        &self,
        body: AnalyzeRepositoryRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        analyze::analyze_repository(self, body, request).await
    }

    pub async fn export_repository(
        &self,
        body: ExportRepositoryRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        export::export_repository(self, body, request).await
    }
}
