use super::SeaOrmStorage;
use crate::entity::areas::{ActiveModel, Column, Entity as Areas};
use crate::errors::{EvalAdminError, Result};
use crate::models::{
    PaginationInfo, PaginationQuery,
    areas::{
        entities::Area,
        requests::{AreaListQuery, CreateAreaRequest, UpdateAreaRequest},
        responses::AreaListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_area_impl(&self, req: CreateAreaRequest) -> Result<Area> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("创建领域失败: {e}")))?;

        Ok(result.into_area())
    }

    pub async fn get_area_by_id_impl(&self, id: i64) -> Result<Option<Area>> {
        let result = Areas::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询领域失败: {e}")))?;

        Ok(result.map(|m| m.into_area()))
    }

    pub async fn list_areas_with_pagination_impl(
        &self,
        query: AreaListQuery,
    ) -> Result<AreaListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Areas::find();
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.contains(escape_like_pattern(search.trim())));
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询领域总数失败: {e}")))?;
        let areas = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询领域列表失败: {e}")))?;

        Ok(AreaListResponse {
            items: areas.into_iter().map(|m| m.into_area()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_area_impl(
        &self,
        id: i64,
        update: UpdateAreaRequest,
    ) -> Result<Option<Area>> {
        if self.get_area_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(description);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("更新领域失败: {e}")))?;

        self.get_area_by_id_impl(id).await
    }

    pub async fn delete_area_impl(&self, id: i64) -> Result<bool> {
        let result = Areas::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("删除领域失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
