use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::entity::{answers, question_options};
use crate::errors::{EvalAdminError, Result};
use crate::models::questions::{
    entities::Question,
    requests::{QuestionDraft, QuestionOptionInput},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 按位置列出测评下的题目（含选项）
    pub async fn list_questions_impl(&self, evaluation_id: i64) -> Result<Vec<Question>> {
        let models = Questions::find()
            .filter(Column::EvaluationId.eq(evaluation_id))
            .order_by_asc(Column::Position)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询题目列表失败: {e}")))?;

        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let options = question_options::Entity::find()
            .filter(question_options::Column::QuestionId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询选项失败: {e}")))?;

        let mut grouped: HashMap<i64, Vec<question_options::Model>> = HashMap::new();
        for option in options {
            grouped.entry(option.question_id).or_default().push(option);
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let opts = grouped.remove(&m.id).unwrap_or_default();
                m.into_question(opts)
            })
            .collect())
    }

    pub async fn get_question_by_id_impl(&self, id: i64) -> Result<Option<Question>> {
        let Some(model) = Questions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询题目失败: {e}")))?
        else {
            return Ok(None);
        };

        let options = question_options::Entity::find()
            .filter(question_options::Column::QuestionId.eq(id))
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询选项失败: {e}")))?;

        Ok(Some(model.into_question(options)))
    }

    /// 批量创建题目，任一失败则整体回滚
    pub async fn create_questions_impl(
        &self,
        evaluation_id: i64,
        drafts: Vec<QuestionDraft>,
    ) -> Result<Vec<Question>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("开启事务失败: {e}")))?;

        let max_position: Option<Option<i32>> = Questions::find()
            .select_only()
            .column_as(Column::Position.max(), "max_position")
            .filter(Column::EvaluationId.eq(evaluation_id))
            .into_tuple()
            .one(&txn)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询题目位置失败: {e}")))?;
        let mut next_position = max_position.flatten().unwrap_or(0) + 1;

        let now = chrono::Utc::now().timestamp();
        let mut created_ids = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let position = match draft.position {
                Some(p) => p,
                None => {
                    let p = next_position;
                    next_position += 1;
                    p
                }
            };

            let model = ActiveModel {
                evaluation_id: Set(evaluation_id),
                text: Set(draft.text),
                question_type: Set(draft.question_type.to_string()),
                language: Set(draft.language),
                points: Set(draft.points),
                position: Set(position),
                explanation: Set(draft.explanation),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            let inserted = model
                .insert(&txn)
                .await
                .map_err(|e| EvalAdminError::database_operation(format!("创建题目失败: {e}")))?;

            insert_options(&txn, inserted.id, draft.options).await?;
            created_ids.push(inserted.id);
        }

        txn.commit()
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("提交事务失败: {e}")))?;

        let mut created = Vec::with_capacity(created_ids.len());
        for id in created_ids {
            if let Some(question) = self.get_question_by_id_impl(id).await? {
                created.push(question);
            }
        }
        Ok(created)
    }

    /// 覆盖题目字段，选项按位置原地更新以保留已有选项 ID
    pub async fn replace_question_impl(
        &self,
        id: i64,
        draft: QuestionDraft,
    ) -> Result<Option<Question>> {
        let Some(existing) = Questions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询题目失败: {e}")))?
        else {
            return Ok(None);
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            id: Set(id),
            text: Set(draft.text),
            question_type: Set(draft.question_type.to_string()),
            language: Set(draft.language),
            points: Set(draft.points),
            position: Set(draft.position.unwrap_or(existing.position)),
            explanation: Set(draft.explanation),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        model
            .update(&txn)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("更新题目失败: {e}")))?;

        sync_options(&txn, id, draft.options).await?;

        txn.commit()
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_question_by_id_impl(id).await
    }

    pub async fn delete_question_impl(&self, id: i64) -> Result<bool> {
        let result = Questions::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("删除题目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_questions_by_evaluation_impl(&self, evaluation_id: i64) -> Result<u64> {
        Questions::find()
            .filter(Column::EvaluationId.eq(evaluation_id))
            .count(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("统计题目数量失败: {e}")))
    }

    pub async fn count_answers_by_question_impl(&self, question_id: i64) -> Result<u64> {
        answers::Entity::find()
            .filter(answers::Column::QuestionId.eq(question_id))
            .count(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("统计作答数量失败: {e}")))
    }
}

/// 按位置对齐已有选项：重叠部分原地更新，多出的新增，缺少的删除。
/// 已作答的选项 ID 因此在仅修改文字或正确标记时保持不变。
async fn sync_options<C: ConnectionTrait>(
    conn: &C,
    question_id: i64,
    options: Vec<QuestionOptionInput>,
) -> Result<()> {
    let existing = question_options::Entity::find()
        .filter(question_options::Column::QuestionId.eq(question_id))
        .order_by_asc(question_options::Column::Position)
        .order_by_asc(question_options::Column::Id)
        .all(conn)
        .await
        .map_err(|e| EvalAdminError::database_operation(format!("查询选项失败: {e}")))?;

    let keep = existing.len().min(options.len());
    let mut incoming = options.into_iter();

    for (idx, model) in existing.iter().take(keep).enumerate() {
        let Some(option) = incoming.next() else {
            break;
        };
        let mut active: question_options::ActiveModel = model.clone().into();
        active.text = Set(option.text);
        active.is_correct = Set(option.is_correct);
        active.position = Set(idx as i32 + 1);
        active
            .update(conn)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("更新选项失败: {e}")))?;
    }

    let surplus: Vec<i64> = existing.iter().skip(keep).map(|m| m.id).collect();
    if !surplus.is_empty() {
        question_options::Entity::delete_many()
            .filter(question_options::Column::Id.is_in(surplus))
            .exec(conn)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("删除选项失败: {e}")))?;
    }

    let added: Vec<question_options::ActiveModel> = incoming
        .enumerate()
        .map(|(offset, option)| question_options::ActiveModel {
            question_id: Set(question_id),
            text: Set(option.text),
            is_correct: Set(option.is_correct),
            position: Set((keep + offset) as i32 + 1),
            ..Default::default()
        })
        .collect();
    if !added.is_empty() {
        question_options::Entity::insert_many(added)
            .exec(conn)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("创建选项失败: {e}")))?;
    }

    Ok(())
}

/// 按输入顺序写入选项，位置从 1 开始
async fn insert_options<C: ConnectionTrait>(
    conn: &C,
    question_id: i64,
    options: Vec<QuestionOptionInput>,
) -> Result<()> {
    if options.is_empty() {
        return Ok(());
    }

    let models: Vec<question_options::ActiveModel> = options
        .into_iter()
        .enumerate()
        .map(|(idx, option)| question_options::ActiveModel {
            question_id: Set(question_id),
            text: Set(option.text),
            is_correct: Set(option.is_correct),
            position: Set(idx as i32 + 1),
            ..Default::default()
        })
        .collect();

    question_options::Entity::insert_many(models)
        .exec(conn)
        .await
        .map_err(|e| EvalAdminError::database_operation(format!("创建选项失败: {e}")))?;

    Ok(())
}
