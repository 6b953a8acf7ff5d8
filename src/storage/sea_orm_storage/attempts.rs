use super::SeaOrmStorage;
use crate::entity::attempts::{ActiveModel, Column, Entity as Attempts};
use crate::entity::evaluations;
use crate::errors::{EvalAdminError, Result};
use crate::models::{
    PaginationInfo, PaginationQuery,
    attempts::{
        entities::{Attempt, AttemptStatus},
        requests::{AttemptListQuery, NewAttempt, UpdateAttemptRequest},
        responses::AttemptListResponse,
    },
};
use crate::utils::random_code::{generate_random_code, normalize_code};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::warn;

// 访问码冲突时的最大重试次数
const CODE_RETRY_LIMIT: usize = 5;

impl SeaOrmStorage {
    pub async fn create_attempt_impl(&self, attempt: NewAttempt) -> Result<Attempt> {
        let now = chrono::Utc::now().timestamp();
        let mut last_error = None;

        for _ in 0..CODE_RETRY_LIMIT {
            let code = generate_random_code(attempt.code_length);

            let model = ActiveModel {
                evaluation_id: Set(attempt.evaluation_id),
                created_by: Set(attempt.created_by),
                title: Set(attempt.title.clone()),
                code: Set(code.clone()),
                start_time: Set(attempt.start_time),
                end_time: Set(attempt.end_time),
                closed: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            match model.insert(&self.db).await {
                Ok(inserted) => return Ok(inserted.into_attempt()),
                Err(e) => {
                    let err = EvalAdminError::database_operation(format!("创建场次失败: {e}"));
                    if !err.is_unique_violation() {
                        return Err(err);
                    }
                    warn!("Attempt code collision on {code}, regenerating");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| EvalAdminError::database_operation("无法生成唯一访问码")))
    }

    pub async fn get_attempt_by_id_impl(&self, id: i64) -> Result<Option<Attempt>> {
        let result = Attempts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询场次失败: {e}")))?;

        Ok(result.map(|m| m.into_attempt()))
    }

    /// 按访问码查找（忽略大小写与空白）
    pub async fn get_attempt_by_code_impl(&self, code: &str) -> Result<Option<Attempt>> {
        let normalized = normalize_code(code);
        if normalized.is_empty() {
            return Ok(None);
        }

        let result = Attempts::find()
            .filter(Column::Code.eq(normalized))
            .one(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询场次失败: {e}")))?;

        Ok(result.map(|m| m.into_attempt()))
    }

    pub async fn list_attempts_with_pagination_impl(
        &self,
        query: AttemptListQuery,
    ) -> Result<AttemptListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);
        let now = chrono::Utc::now().timestamp();

        let mut select = Attempts::find();

        if let Some(evaluation_id) = query.evaluation_id {
            select = select.filter(Column::EvaluationId.eq(evaluation_id));
        }

        if let Some(author_id) = query.author_id {
            select = select
                .inner_join(evaluations::Entity)
                .filter(evaluations::Column::AuthorId.eq(author_id));
        }

        if let Some(status) = query.status {
            select = select.filter(status_condition(status, now));
        }

        let paginator = select
            .order_by_desc(Column::StartTime)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询场次总数失败: {e}")))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询场次列表失败: {e}")))?;

        Ok(AttemptListResponse {
            items: models.into_iter().map(|m| m.into_attempt()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_attempt_impl(
        &self,
        id: i64,
        update: UpdateAttemptRequest,
    ) -> Result<Option<Attempt>> {
        if self.get_attempt_by_id_impl(id).await?.is_none() {
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
        if let Some(start_time) = update.start_time {
            model.start_time = Set(start_time.timestamp());
        }
        if let Some(end_time) = update.end_time {
            model.end_time = Set(end_time.timestamp());
        }
        if let Some(closed) = update.closed {
            model.closed = Set(closed);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("更新场次失败: {e}")))?;

        self.get_attempt_by_id_impl(id).await
    }

    pub async fn delete_attempt_impl(&self, id: i64) -> Result<bool> {
        let result = Attempts::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("删除场次失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_attempts_by_evaluation_impl(&self, evaluation_id: i64) -> Result<u64> {
        Attempts::find()
            .filter(Column::EvaluationId.eq(evaluation_id))
            .count(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("统计场次数量失败: {e}")))
    }

    /// 测评下全部场次 ID
    pub(crate) async fn attempt_ids_by_evaluation(&self, evaluation_id: i64) -> Result<Vec<i64>> {
        Attempts::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::EvaluationId.eq(evaluation_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询场次失败: {e}")))
    }
}

/// 将推导状态转换为时间窗口条件
fn status_condition(status: AttemptStatus, now: i64) -> Condition {
    match status {
        AttemptStatus::Scheduled => Condition::all()
            .add(Column::Closed.eq(false))
            .add(Column::StartTime.gt(now)),
        AttemptStatus::Active => Condition::all()
            .add(Column::Closed.eq(false))
            .add(Column::StartTime.lte(now))
            .add(Column::EndTime.gt(now)),
        AttemptStatus::Finished => Condition::any()
            .add(Column::Closed.eq(true))
            .add(Column::EndTime.lte(now)),
    }
}
