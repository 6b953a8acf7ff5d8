pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::areas::requests::{AreaListParams, CreateAreaRequest, UpdateAreaRequest};
use crate::storage::Storage;

pub struct AreaService {
    storage: Option<Arc<dyn Storage>>,
}

impl AreaService {
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

    pub async fn list_areas(
        &self,
        query: AreaListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_areas(self, query, request).await
    }

    pub async fn get_area(&self, area_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_area(self, area_id, request).await
    }

    // 领域下的教师
    pub async fn list_area_teachers(
        &self,
        area_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::list_area_teachers(self, area_id, request).await
    }

    pub async fn create_area(
        &self,
        area: CreateAreaRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_area(self, area, request).await
    }

    pub async fn update_area(
        &self,
        area_id: i64,
        update: UpdateAreaRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_area(self, area_id, update, request).await
    }

    pub async fn delete_area(
        &self,
        area_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_area(self, area_id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ErrorCode, users::entities::UserRole};
    use crate::services::test_support::{Fixture, status_and_code};

    #[actix_web::test]
    async fn test_area_in_use_cannot_be_deleted() {
        let fx = Fixture::new().await;
        let service = AreaService::new_lazy();
        let admin = fx.user("root", UserRole::Admin, None).await;
        let used = fx.area("Astronomy").await;
        let unused = fx.area("Botany").await;
        fx.user("stargazer", UserRole::Teacher, Some(used)).await;

        let request = fx.request_as(&admin);
        let response = service.delete_area(used, &request).await.unwrap();
        assert_eq!(
            status_and_code(response).await,
            (409, ErrorCode::AreaInUse as i64)
        );

        let response = service.delete_area(unused, &request).await.unwrap();
        assert_eq!(status_and_code(response).await.0, 200);
        let response = service.delete_area(unused, &request).await.unwrap();
        assert_eq!(
            status_and_code(response).await,
            (404, ErrorCode::AreaNotFound as i64)
        );
    }
}
