use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::{answers, areas, attempts, evaluations, questions, submissions, users};
use crate::errors::{EvalAdminError, Result};
use crate::models::{
    reports::responses::{OverviewReport, ReportTotals, group_totals, round2},
    submissions::entities::{Answer, Submission, SubmissionStatus},
    users::entities::UserRole,
};
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select,
    sea_query::{Expr, ExprTrait, Func, SimpleExpr},
};

// 无所属领域时的分组键
const UNASSIGNED_AREA: &str = "unassigned";

/// 指定作者时只保留其测评下的场次答卷
fn scoped_submissions(author_id: Option<i64>) -> Select<submissions::Entity> {
    let select = submissions::Entity::find();
    match author_id {
        Some(author_id) => select
            .join(JoinType::InnerJoin, submissions::Relation::Attempt.def())
            .join(JoinType::InnerJoin, attempts::Relation::Evaluation.def())
            .filter(evaluations::Column::AuthorId.eq(author_id)),
        None => select,
    }
}

impl SeaOrmStorage {
    /// 总览统计，全部在数据库侧聚合；指定 author_id 时只统计该教师的测评
    pub async fn overview_report_impl(&self, author_id: Option<i64>) -> Result<OverviewReport> {
        let area_names: HashMap<i64, String> = areas::Entity::find()
            .select_only()
            .column(areas::Column::Id)
            .column(areas::Column::Name)
            .into_tuple::<(i64, String)>()
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询领域失败: {e}")))?
            .into_iter()
            .collect();
        let area_key = |area_id: Option<i64>| {
            area_id
                .and_then(|id| area_names.get(&id).cloned())
                .unwrap_or_else(|| UNASSIGNED_AREA.to_string())
        };

        // 教师按领域计数 (area_id, count)
        let mut teacher_select = users::Entity::find()
            .select_only()
            .column(users::Column::AreaId)
            .column_as(users::Column::Id.count(), "count")
            .filter(users::Column::Role.eq(UserRole::TEACHER))
            .group_by(users::Column::AreaId);
        if let Some(author_id) = author_id {
            teacher_select = teacher_select.filter(users::Column::Id.eq(author_id));
        }
        let teachers_by_area: Vec<(Option<i64>, i64)> = teacher_select
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("统计教师失败: {e}")))?;

        // 教师只看到参加过其场次的学生
        let students: i64 = match author_id {
            Some(author_id) => scoped_submissions(Some(author_id))
                .select_only()
                .column_as(
                    SimpleExpr::from(Func::count_distinct(Expr::col(
                        submissions::Column::StudentId.as_column_ref(),
                    ))),
                    "students",
                )
                .into_tuple::<i64>()
                .one(&self.db)
                .await
                .map_err(|e| EvalAdminError::database_operation(format!("统计学生失败: {e}")))?
                .unwrap_or(0),
            None => users::Entity::find()
                .filter(users::Column::Role.eq(UserRole::STUDENT))
                .count(&self.db)
                .await
                .map_err(|e| EvalAdminError::database_operation(format!("统计学生失败: {e}")))?
                as i64,
        };

        // 测评按作者所属领域计数 (area_id, count)，作者可能是管理员
        let mut eval_select = evaluations::Entity::find()
            .select_only()
            .column(users::Column::AreaId)
            .column_as(evaluations::Column::Id.count(), "count")
            .join(JoinType::LeftJoin, evaluations::Relation::Author.def())
            .group_by(users::Column::AreaId);
        if let Some(author_id) = author_id {
            eval_select = eval_select.filter(evaluations::Column::AuthorId.eq(author_id));
        }
        let evaluations_by_area: Vec<(Option<i64>, i64)> = eval_select
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("统计测评失败: {e}")))?;

        // 题目按题型计数
        let mut question_select = questions::Entity::find()
            .select_only()
            .column(questions::Column::QuestionType)
            .column_as(questions::Column::Id.count(), "count")
            .group_by(questions::Column::QuestionType);
        if let Some(author_id) = author_id {
            question_select = question_select
                .join(JoinType::InnerJoin, questions::Relation::Evaluation.def())
                .filter(evaluations::Column::AuthorId.eq(author_id));
        }
        let questions_by_type: Vec<(String, i64)> = question_select
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("统计题目失败: {e}")))?;

        let mut attempt_select = attempts::Entity::find();
        if let Some(author_id) = author_id {
            attempt_select = attempt_select
                .join(JoinType::InnerJoin, attempts::Relation::Evaluation.def())
                .filter(evaluations::Column::AuthorId.eq(author_id));
        }
        let attempts_total = attempt_select
            .count(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("统计场次失败: {e}")))?;

        let submissions_total = scoped_submissions(author_id)
            .count(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("统计答卷失败: {e}")))?;

        // 已提交且已有得分的答卷得分率均值
        let percentage = Expr::col(submissions::Column::Score.as_column_ref())
            .mul(100.0)
            .div(Expr::col(submissions::Column::MaxScore.as_column_ref()));
        let average_percentage = scoped_submissions(author_id)
            .select_only()
            .column_as(SimpleExpr::from(Func::avg(percentage)), "average")
            .filter(submissions::Column::Status.eq(SubmissionStatus::Submitted.to_string()))
            .filter(submissions::Column::Score.is_not_null())
            .filter(submissions::Column::MaxScore.gt(0.0))
            .into_tuple::<Option<f64>>()
            .one(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("统计平均得分失败: {e}")))?
            .flatten()
            .map(round2);

        let areas_total = if author_id.is_some() {
            teachers_by_area.iter().filter(|(area, _)| area.is_some()).count() as i64
        } else {
            area_names.len() as i64
        };

        Ok(OverviewReport {
            totals: ReportTotals {
                areas: areas_total,
                teachers: teachers_by_area.iter().map(|(_, n)| n).sum(),
                students,
                evaluations: evaluations_by_area.iter().map(|(_, n)| n).sum(),
                questions: questions_by_type.iter().map(|(_, n)| n).sum(),
                attempts: attempts_total as i64,
                submissions: submissions_total as i64,
            },
            average_percentage,
            evaluations_by_area: group_totals(
                evaluations_by_area
                    .into_iter()
                    .map(|(area, n)| (area_key(area), n)),
            ),
            teachers_by_area: group_totals(
                teachers_by_area
                    .into_iter()
                    .map(|(area, n)| (area_key(area), n)),
            ),
            questions_by_type: group_totals(questions_by_type),
        })
    }

    /// 测评下全部场次的答卷
    pub async fn list_evaluation_submissions_impl(
        &self,
        evaluation_id: i64,
    ) -> Result<Vec<Submission>> {
        let attempt_ids = self.attempt_ids_by_evaluation(evaluation_id).await?;
        if attempt_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = submissions::Entity::find()
            .filter(submissions::Column::AttemptId.is_in(attempt_ids))
            .order_by_asc(submissions::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询答卷失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 测评下已提交答卷的全部作答
    pub async fn list_evaluation_answers_impl(&self, evaluation_id: i64) -> Result<Vec<Answer>> {
        let submission_ids: Vec<i64> = self
            .list_evaluation_submissions_impl(evaluation_id)
            .await?
            .into_iter()
            .filter(|s| s.status == SubmissionStatus::Submitted)
            .map(|s| s.id)
            .collect();
        if submission_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = answers::Entity::find()
            .filter(answers::Column::SubmissionId.is_in(submission_ids))
            .all(&self.db)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("查询作答失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_answer()).collect())
    }
}
