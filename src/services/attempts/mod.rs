pub mod create;
pub mod delete;
pub mod export;
pub mod get;
pub mod grade;
pub mod list;
pub mod submissions;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::attempts::requests::{
    AttemptListParams, CreateAttemptRequest, GradeAnswerRequest, UpdateAttemptRequest,
};
use crate::models::common::ExportQuery;
use crate::storage::Storage;

pub struct AttemptService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttemptService {
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

    pub async fn list_attempts(
        &self,
        query: AttemptListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_attempts(self, query, request).await
    }

    pub async fn create_attempt(
        &self,
        body: CreateAttemptRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_attempt(self, body, request).await
    }

    pub async fn get_attempt(&self, attempt_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_attempt(self, attempt_id, request).await
    }

    pub async fn update_attempt(
        &self,
        attempt_id: i64,
        update: UpdateAttemptRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_attempt(self, attempt_id, update, request).await
    }

    // 立即结束场次
    pub async fn close_attempt(&self, attempt_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        update::close_attempt(self, attempt_id, request).await
    }

    pub async fn delete_attempt(
        &self,
        attempt_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_attempt(self, attempt_id, request).await
    }

    pub async fn list_submissions(
        &self,
        attempt_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::list_submissions(self, attempt_id, request).await
    }

    pub async fn grade_answer(
        &self,
        answer_id: i64,
        body: GradeAnswerRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_answer(self, answer_id, body, request).await
    }

    pub async fn export_results(
        &self,
        attempt_id: i64,
        query: ExportQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        export::export_results(self, attempt_id, query, request).await
    }
}

/// 校验时间窗口：结束晚于开始，且不超过最长时长
pub fn validate_window(start: i64, end: i64, max_window_hours: i64) -> Result<(), String> {
    if end <= start {
        return Err("End time must be later than start time".to_string());
    }
    if max_window_hours > 0 && end - start > max_window_hours * 3600 {
        return Err(format!(
            "An attempt cannot last longer than {max_window_hours} hours"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_window() {
        assert!(validate_window(100, 100, 12).is_err());
        assert!(validate_window(200, 100, 12).is_err());
        assert!(validate_window(0, 3600, 12).is_ok());
        assert!(validate_window(0, 12 * 3600, 12).is_ok());
        assert!(validate_window(0, 12 * 3600 + 1, 12).is_err());
        assert!(validate_window(0, 100 * 3600, 0).is_ok());
    }
}
