pub mod create;
pub mod delete;
pub mod export;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::common::ExportQuery;
use crate::models::evaluations::requests::{
    CreateEvaluationRequest, EvaluationListParams, UpdateEvaluationRequest,
};
use crate::storage::Storage;

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl EvaluationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_evaluations(
        &self,
        query: EvaluationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_evaluations(self, query, request).await
    }

    pub async fn create_evaluation(
        &self,
        body: CreateEvaluationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_evaluation(self, body, request).await
    }

    pub async fn get_evaluation(
        &self,
        evaluation_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_evaluation(self, evaluation_id, request).await
    }

    pub async fn update_evaluation(
        &self,
        evaluation_id: i64,
        update: UpdateEvaluationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_evaluation(self, evaluation_id, update, request).await
    }

    pub async fn delete_evaluation(
        &self,
        evaluation_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_evaluation(self, evaluation_id, request).await
    }

    pub async fn export_evaluation(
        &self,
        evaluation_id: i64,
        query: ExportQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        export::export_evaluation(self, evaluation_id, query, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ErrorCode, users::entities::UserRole};
    use crate::services::test_support::{Fixture, status_and_code};

    #[actix_web::test]
    async fn test_evaluation_with_attempts_cannot_be_deleted() {
        let fx = Fixture::new().await;
        let service = EvaluationService::new_lazy();
        let teacher = fx.user("owner", UserRole::Teacher, None).await;
        let other = fx.user("stranger", UserRole::Teacher, None).await;
        let (scheduled, _) = fx.evaluation(&teacher, "Scheduled").await;
        let (draft, _) = fx.evaluation(&teacher, "Draft").await;
        fx.attempt(&scheduled, &teacher, 3600, 7200).await;

        let request = fx.request_as(&teacher);
        let response = service.delete_evaluation(scheduled.id, &request).await.unwrap();
        assert_eq!(
            status_and_code(response).await,
            (409, ErrorCode::EvaluationHasAttempts as i64)
        );

        // 其他教师无权删除
        let response = service
            .delete_evaluation(draft.id, &fx.request_as(&other))
            .await
            .unwrap();
        assert_eq!(
            status_and_code(response).await,
            (403, ErrorCode::EvaluationPermissionDenied as i64)
        );

        let response = service.delete_evaluation(draft.id, &request).await.unwrap();
        assert_eq!(status_and_code(response).await.0, 200);
    }
}
