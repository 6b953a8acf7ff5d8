//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod areas;
mod attempts;
mod evaluations;
mod questions;
mod reports;
mod submissions;
mod users;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{EvalAdminError, Result};
use crate::models::{
    areas::{
        entities::Area,
        requests::{AreaListQuery, CreateAreaRequest, UpdateAreaRequest},
        responses::AreaListResponse,
    },
    attempts::{
        entities::Attempt,
        requests::{AttemptListQuery, NewAttempt, UpdateAttemptRequest},
        responses::AttemptListResponse,
    },
    evaluations::{
        entities::{Evaluation, EvaluationDetail},
        requests::{EvaluationListQuery, UpdateEvaluationRequest},
        responses::EvaluationListResponse,
    },
    questions::{entities::Question, requests::QuestionDraft},
    reports::responses::OverviewReport,
    submissions::{
        entities::{Answer, Submission, SubmissionSummary},
        requests::{AnswerGrade, AnswerUpsert},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| EvalAdminError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + 外键约束）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");
        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EvalAdminError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(if in_memory {
                SqliteJournalMode::Memory
            } else {
                SqliteJournalMode::Wal
            })
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 内存库每个连接都是独立数据库，只能用单连接
        let max_connections = if in_memory { 1 } else { pool_size };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(if in_memory {
                None
            } else {
                Some(Duration::from_secs(300))
            })
            .max_lifetime(if in_memory {
                None
            } else {
                Some(Duration::from_secs(1800))
            })
            .connect_with(opt)
            .await
            .map_err(|e| EvalAdminError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| EvalAdminError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 推断数据库类型
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EvalAdminError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

#[async_trait::async_trait]
impl Storage for SeaOrmStorage {
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn create_area(&self, area: CreateAreaRequest) -> Result<Area> {
        self.create_area_impl(area).await
    }

    async fn get_area_by_id(&self, id: i64) -> Result<Option<Area>> {
        self.get_area_by_id_impl(id).await
    }

    async fn list_areas_with_pagination(&self, query: AreaListQuery) -> Result<AreaListResponse> {
        self.list_areas_with_pagination_impl(query).await
    }

    async fn update_area(&self, id: i64, update: UpdateAreaRequest) -> Result<Option<Area>> {
        self.update_area_impl(id, update).await
    }

    async fn delete_area(&self, id: i64) -> Result<bool> {
        self.delete_area_impl(id).await
    }

    async fn count_users_in_area(&self, area_id: i64) -> Result<u64> {
        self.count_users_in_area_impl(area_id).await
    }

    async fn list_area_teachers(&self, area_id: i64) -> Result<Vec<User>> {
        self.list_area_teachers_impl(area_id).await
    }

    async fn create_evaluation(
        &self,
        title: String,
        description: Option<String>,
        author_id: i64,
    ) -> Result<Evaluation> {
        self.create_evaluation_impl(title, description, author_id)
            .await
    }

    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_id_impl(id).await
    }

    async fn get_evaluation_detail(&self, id: i64) -> Result<Option<EvaluationDetail>> {
        self.get_evaluation_detail_impl(id).await
    }

    async fn list_evaluations_with_pagination(
        &self,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse> {
        self.list_evaluations_with_pagination_impl(query).await
    }

    async fn update_evaluation(
        &self,
        id: i64,
        update: UpdateEvaluationRequest,
    ) -> Result<Option<Evaluation>> {
        self.update_evaluation_impl(id, update).await
    }

    async fn delete_evaluation(&self, id: i64) -> Result<bool> {
        self.delete_evaluation_impl(id).await
    }

    async fn count_evaluations_by_author(&self, author_id: i64) -> Result<u64> {
        self.count_evaluations_by_author_impl(author_id).await
    }

    async fn list_questions(&self, evaluation_id: i64) -> Result<Vec<Question>> {
        self.list_questions_impl(evaluation_id).await
    }

    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>> {
        self.get_question_by_id_impl(id).await
    }

    async fn create_questions(
        &self,
        evaluation_id: i64,
        drafts: Vec<QuestionDraft>,
    ) -> Result<Vec<Question>> {
        self.create_questions_impl(evaluation_id, drafts).await
    }

    async fn replace_question(&self, id: i64, draft: QuestionDraft) -> Result<Option<Question>> {
        self.replace_question_impl(id, draft).await
    }

    async fn delete_question(&self, id: i64) -> Result<bool> {
        self.delete_question_impl(id).await
    }

    async fn count_questions_by_evaluation(&self, evaluation_id: i64) -> Result<u64> {
        self.count_questions_by_evaluation_impl(evaluation_id).await
    }

    async fn count_answers_by_question(&self, question_id: i64) -> Result<u64> {
        self.count_answers_by_question_impl(question_id).await
    }

    async fn create_attempt(&self, attempt: NewAttempt) -> Result<Attempt> {
        self.create_attempt_impl(attempt).await
    }

    async fn get_attempt_by_id(&self, id: i64) -> Result<Option<Attempt>> {
        self.get_attempt_by_id_impl(id).await
    }

    async fn get_attempt_by_code(&self, code: &str) -> Result<Option<Attempt>> {
        self.get_attempt_by_code_impl(code).await
    }

    async fn list_attempts_with_pagination(
        &self,
        query: AttemptListQuery,
    ) -> Result<AttemptListResponse> {
        self.list_attempts_with_pagination_impl(query).await
    }

    async fn update_attempt(
        &self,
        id: i64,
        update: UpdateAttemptRequest,
    ) -> Result<Option<Attempt>> {
        self.update_attempt_impl(id, update).await
    }

    async fn delete_attempt(&self, id: i64) -> Result<bool> {
        self.delete_attempt_impl(id).await
    }

    async fn count_attempts_by_evaluation(&self, evaluation_id: i64) -> Result<u64> {
        self.count_attempts_by_evaluation_impl(evaluation_id).await
    }

    async fn create_submission(
        &self,
        attempt_id: i64,
        student_id: i64,
        max_score: f64,
    ) -> Result<(Submission, bool)> {
        self.create_submission_impl(attempt_id, student_id, max_score)
            .await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission_by_attempt_and_student(
        &self,
        attempt_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_attempt_and_student_impl(attempt_id, student_id)
            .await
    }

    async fn touch_submission(&self, id: i64) -> Result<bool> {
        self.touch_submission_impl(id).await
    }

    async fn list_submission_summaries(&self, attempt_id: i64) -> Result<Vec<SubmissionSummary>> {
        self.list_submission_summaries_impl(attempt_id).await
    }

    async fn list_answers(&self, submission_id: i64) -> Result<Vec<Answer>> {
        self.list_answers_impl(submission_id).await
    }

    async fn get_answer_by_id(&self, id: i64) -> Result<Option<Answer>> {
        self.get_answer_by_id_impl(id).await
    }

    async fn upsert_answer(&self, answer: AnswerUpsert) -> Result<Option<Answer>> {
        self.upsert_answer_impl(answer).await
    }

    async fn finalize_submission(
        &self,
        submission_id: i64,
        grades: Vec<AnswerGrade>,
        max_score: f64,
    ) -> Result<Option<Submission>> {
        self.finalize_submission_impl(submission_id, grades, max_score)
            .await
    }

    async fn grade_answer(
        &self,
        answer_id: i64,
        score: f64,
        is_correct: Option<bool>,
    ) -> Result<Option<(Answer, Submission)>> {
        self.grade_answer_impl(answer_id, score, is_correct).await
    }

    async fn overview_report(&self, author_id: Option<i64>) -> Result<OverviewReport> {
        self.overview_report_impl(author_id).await
    }

    async fn list_evaluation_submissions(&self, evaluation_id: i64) -> Result<Vec<Submission>> {
        self.list_evaluation_submissions_impl(evaluation_id).await
    }

    async fn list_evaluation_answers(&self, evaluation_id: i64) -> Result<Vec<Answer>> {
        self.list_evaluation_answers_impl(evaluation_id).await
    }
}
