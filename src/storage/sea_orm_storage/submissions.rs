use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::{answers, users};
use crate::errors::{EvalAdminError, Result};
use crate::models::submissions::{
    entities::{Answer, Submission, SubmissionStatus, SubmissionSummary},
    requests::{AnswerGrade, AnswerUpsert},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait, sea_query::Expr,
};
use tracing::debug;

impl SeaOrmStorage {
    /// 创建答卷，返回 (答卷, 是否新建)；并发重复加入时返回已存在的答卷
    pub async fn create_submission_impl(
        &self,
        attempt_id: i64,
        student_id: i64,
        max_score: f64,
    ) -> Result<(Submission, bool)> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            attempt_id: Set(attempt_id),
            student_id: Set(student_id),
            status: Set(SubmissionStatus::InProgress.to_string()),
            score: Set(None),
            max_score: Set(max_score),
            started_at: Set(now),
            last_activity_at: Set(now),
            submitted_at: Set(None),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(inserted) => Ok((inserted.into_submission(), true)),
            Err(e) => {
                let err = EvalAdminError::database_operation(format!("创建答卷失败: {e}"));
                if !err.is_unique_violation() {
                    return Err(err);
                }
                debug!("Submission for attempt {attempt_id} / student {student_id} already exists");
                self.get_submission_by_attempt_and_student_impl(attempt_id, student_id)
                    .await?
                    .map(|existing| (existing, false))
                    .ok_or(err)
            }
        }
    }

    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询答卷失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_submission_by_attempt_and_student_impl(
        &self,
        attempt_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AttemptId.eq(attempt_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询答卷失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn touch_submission_impl(&self, id: i64) -> Result<bool> {
        let result = Submissions::update_many()
            .col_expr(
                Column::LastActivityAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("更新答卷活动时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 场次下全部答卷概要，按开始时间排序
    pub async fn list_submission_summaries_impl(
        &self,
        attempt_id: i64,
    ) -> Result<Vec<SubmissionSummary>> {
        let rows = Submissions::find()
            .find_also_related(users::Entity)
            .filter(Column::AttemptId.eq(attempt_id))
            .order_by_asc(Column::StartedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询答卷列表失败: {e}")))?;

        let ids: Vec<i64> = rows.iter().map(|(s, _)| s.id).collect();
        let counts = self.answer_counts(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|(submission, student)| {
                let answered_count = counts.get(&submission.id).copied().unwrap_or(0);
                let (student_username, student_display_name) = match student {
                    Some(u) => (u.username, u.display_name),
                    None => (format!("#{}", submission.student_id), None),
                };
                SubmissionSummary {
                    submission: submission.into_submission(),
                    student_username,
                    student_display_name,
                    answered_count,
                }
            })
            .collect())
    }

    pub async fn list_answers_impl(&self, submission_id: i64) -> Result<Vec<Answer>> {
        let models = answers::Entity::find()
            .filter(answers::Column::SubmissionId.eq(submission_id))
            .order_by_asc(answers::Column::QuestionId)
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询作答失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_answer()).collect())
    }

    pub async fn get_answer_by_id_impl(&self, id: i64) -> Result<Option<Answer>> {
        let result = answers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询作答失败: {e}")))?;

        Ok(result.map(|m| m.into_answer()))
    }

    /// 新建或覆盖作答，并刷新答卷活动时间。
    /// 答卷已不在作答中时返回 None，不写入任何内容
    pub async fn upsert_answer_impl(&self, answer: AnswerUpsert) -> Result<Option<Answer>> {
        let now = chrono::Utc::now().timestamp();
        let selected = serde_json::to_string(&answer.selected_options)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("开启事务失败: {e}")))?;

        // 先带状态条件刷新答卷，与并发交卷在同一行上串行
        let touched = Submissions::update_many()
            .col_expr(Column::LastActivityAt, Expr::value(now))
            .filter(Column::Id.eq(answer.submission_id))
            .filter(Column::Status.eq(SubmissionStatus::InProgress.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("更新答卷活动时间失败: {e}")))?;
        if touched.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| EvalAdminError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(None);
        }

        let existing = answers::Entity::find()
            .filter(answers::Column::SubmissionId.eq(answer.submission_id))
            .filter(answers::Column::QuestionId.eq(answer.question_id))
            .one(&txn)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询作答失败: {e}")))?;

        let saved = match existing {
            Some(model) => {
                let mut active: answers::ActiveModel = model.into();
                active.answer_text = Set(answer.answer_text);
                active.selected_options = Set(selected);
                active.is_correct = Set(None);
                active.score = Set(None);
                active.answered_at = Set(now);
                active
                    .update(&txn)
                    .await
                    .map_err(|e| EvalAdminError::database_operation(format!("更新作答失败: {e}")))?
            }
            None => answers::ActiveModel {
                submission_id: Set(answer.submission_id),
                question_id: Set(answer.question_id),
                answer_text: Set(answer.answer_text),
                selected_options: Set(selected),
                is_correct: Set(None),
                score: Set(None),
                answered_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("保存作答失败: {e}")))?,
        };

        txn.commit()
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(saved.into_answer()))
    }

    /// 写入判分并标记答卷为已提交，总分为已判分题目得分之和。
    /// 状态切换带 in_progress 条件，答卷已被提交时返回 None
    pub async fn finalize_submission_impl(
        &self,
        submission_id: i64,
        grades: Vec<AnswerGrade>,
        max_score: f64,
    ) -> Result<Option<Submission>> {
        let now = chrono::Utc::now().timestamp();
        let total: f64 = grades.iter().filter_map(|g| g.score).sum();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("开启事务失败: {e}")))?;

        let flipped = Submissions::update_many()
            .col_expr(
                Column::Status,
                Expr::value(SubmissionStatus::Submitted.to_string()),
            )
            .col_expr(Column::Score, Expr::value(Some(total)))
            .col_expr(Column::MaxScore, Expr::value(max_score))
            .col_expr(Column::LastActivityAt, Expr::value(now))
            .col_expr(Column::SubmittedAt, Expr::value(Some(now)))
            .filter(Column::Id.eq(submission_id))
            .filter(Column::Status.eq(SubmissionStatus::InProgress.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("提交答卷失败: {e}")))?;
        if flipped.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| EvalAdminError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(None);
        }

        for grade in grades {
            answers::Entity::update_many()
                .col_expr(answers::Column::IsCorrect, Expr::value(grade.is_correct))
                .col_expr(answers::Column::Score, Expr::value(grade.score))
                .filter(answers::Column::SubmissionId.eq(submission_id))
                .filter(answers::Column::QuestionId.eq(grade.question_id))
                .exec(&txn)
                .await
                .map_err(|e| EvalAdminError::database_operation(format!("写入判分失败: {e}")))?;
        }

        let updated = Submissions::find_by_id(submission_id)
            .one(&txn)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询答卷失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.map(|m| m.into_submission()))
    }

    /// 人工评分单题并重算答卷总分
    pub async fn grade_answer_impl(
        &self,
        answer_id: i64,
        score: f64,
        is_correct: Option<bool>,
    ) -> Result<Option<(Answer, Submission)>> {
        let Some(model) = answers::Entity::find_by_id(answer_id)
            .one(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询作答失败: {e}")))?
        else {
            return Ok(None);
        };
        let submission_id = model.submission_id;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("开启事务失败: {e}")))?;

        let mut active: answers::ActiveModel = model.into();
        active.score = Set(Some(score));
        active.is_correct = Set(is_correct);
        let answer = active
            .update(&txn)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("更新评分失败: {e}")))?;

        let scores: Vec<Option<f64>> = answers::Entity::find()
            .select_only()
            .column(answers::Column::Score)
            .filter(answers::Column::SubmissionId.eq(submission_id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询作答得分失败: {e}")))?;
        let total: f64 = scores.into_iter().flatten().sum();

        let submission = ActiveModel {
            id: Set(submission_id),
            score: Set(Some(total)),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| EvalAdminError::database_operation(format!("更新答卷得分失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some((answer.into_answer(), submission.into_submission())))
    }

    /// 批量统计各答卷作答数
    async fn answer_counts(&self, submission_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        if submission_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = answers::Entity::find()
            .select_only()
            .column(answers::Column::SubmissionId)
            .column_as(answers::Column::Id.count(), "count")
            .filter(answers::Column::SubmissionId.is_in(submission_ids.to_vec()))
            .group_by(answers::Column::SubmissionId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("统计作答数量失败: {e}")))?;

        Ok(rows.into_iter().collect())
    }
}
