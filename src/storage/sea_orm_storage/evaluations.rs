use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations};
use crate::entity::questions;
use crate::errors::{EvalAdminError, Result};
use crate::models::{
    PaginationInfo, PaginationQuery,
    evaluations::{
        entities::{Evaluation, EvaluationDetail},
        requests::{EvaluationListQuery, UpdateEvaluationRequest},
        responses::EvaluationListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn create_evaluation_impl(
        &self,
        title: String,
        description: Option<String>,
        author_id: i64,
    ) -> Result<Evaluation> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(title),
            description: Set(description),
            author_id: Set(author_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("创建测评失败: {e}")))?;

        Ok(result.into_evaluation(0))
    }

    pub async fn get_evaluation_by_id_impl(&self, id: i64) -> Result<Option<Evaluation>> {
        let Some(model) = Evaluations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询测评失败: {e}")))?
        else {
            return Ok(None);
        };

        let count = self.count_questions_by_evaluation_impl(id).await?;
        Ok(Some(model.into_evaluation(count)))
    }

    pub async fn get_evaluation_detail_impl(&self, id: i64) -> Result<Option<EvaluationDetail>> {
        let Some(model) = Evaluations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询测评失败: {e}")))?
        else {
            return Ok(None);
        };

        let questions = self.list_questions_impl(id).await?;
        let evaluation = model.into_evaluation(questions.len() as u64);

        Ok(Some(EvaluationDetail {
            evaluation,
            questions,
        }))
    }

    pub async fn list_evaluations_with_pagination_impl(
        &self,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Evaluations::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.contains(&escaped))
                    .add(Column::Description.contains(&escaped)),
            );
        }

        if let Some(author_id) = query.author_id {
            select = select.filter(Column::AuthorId.eq(author_id));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询测评总数失败: {e}")))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询测评列表失败: {e}")))?;

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let counts = self.question_counts(&ids).await?;

        Ok(EvaluationListResponse {
            items: models
                .into_iter()
                .map(|m| {
                    let count = counts.get(&m.id).copied().unwrap_or(0);
                    m.into_evaluation(count)
                })
                .collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_evaluation_impl(
        &self,
        id: i64,
        update: UpdateEvaluationRequest,
    ) -> Result<Option<Evaluation>> {
        if Evaluations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询测评失败: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(description);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("更新测评失败: {e}")))?;

        self.get_evaluation_by_id_impl(id).await
    }

    /// 删除测评（题目与选项由外键级联删除）
    pub async fn delete_evaluation_impl(&self, id: i64) -> Result<bool> {
        let result = Evaluations::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("删除测评失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_evaluations_by_author_impl(&self, author_id: i64) -> Result<u64> {
        Evaluations::find()
            .filter(Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("统计测评数量失败: {e}")))
    }

    /// 批量统计各测评题目数
    async fn question_counts(&self, evaluation_ids: &[i64]) -> Result<HashMap<i64, u64>> {
        if evaluation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = questions::Entity::find()
            .select_only()
            .column(questions::Column::EvaluationId)
            .column_as(questions::Column::Id.count(), "count")
            .filter(questions::Column::EvaluationId.is_in(evaluation_ids.to_vec()))
            .group_by(questions::Column::EvaluationId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("统计题目数量失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (id, count.max(0) as u64))
            .collect())
    }
}
