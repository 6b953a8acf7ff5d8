use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段已是哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 领域管理方法
    async fn create_area(&self, area: CreateAreaRequest) -> Result<Area>;
    async fn get_area_by_id(&self, id: i64) -> Result<Option<Area>>;
    async fn list_areas_with_pagination(&self, query: AreaListQuery) -> Result<AreaListResponse>;
    async fn update_area(&self, id: i64, update: UpdateAreaRequest) -> Result<Option<Area>>;
    async fn delete_area(&self, id: i64) -> Result<bool>;
    // 引用该领域的用户数量
    async fn count_users_in_area(&self, area_id: i64) -> Result<u64>;
    // 领域下的教师
    async fn list_area_teachers(&self, area_id: i64) -> Result<Vec<User>>;

    /// 测评管理方法
    async fn create_evaluation(
        &self,
        title: String,
        description: Option<String>,
        author_id: i64,
    ) -> Result<Evaluation>;
    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>>;
    // 测评及其题目、选项
    async fn get_evaluation_detail(&self, id: i64) -> Result<Option<EvaluationDetail>>;
    async fn list_evaluations_with_pagination(
        &self,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse>;
    async fn update_evaluation(
        &self,
        id: i64,
        update: UpdateEvaluationRequest,
    ) -> Result<Option<Evaluation>>;
    async fn delete_evaluation(&self, id: i64) -> Result<bool>;
    async fn count_evaluations_by_author(&self, author_id: i64) -> Result<u64>;

    /// 题目管理方法
    async fn list_questions(&self, evaluation_id: i64) -> Result<Vec<Question>>;
    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>>;
    // 批量创建（同一事务），未指定位置的题目追加到末尾
    async fn create_questions(
        &self,
        evaluation_id: i64,
        drafts: Vec<QuestionDraft>,
    ) -> Result<Vec<Question>>;
    // 覆盖题目字段并整体替换选项
    async fn replace_question(&self, id: i64, draft: QuestionDraft) -> Result<Option<Question>>;
    async fn delete_question(&self, id: i64) -> Result<bool>;
    async fn count_questions_by_evaluation(&self, evaluation_id: i64) -> Result<u64>;
    async fn count_answers_by_question(&self, question_id: i64) -> Result<u64>;

    /// 场次管理方法
    // 创建场次并生成唯一访问码
    async fn create_attempt(&self, attempt: NewAttempt) -> Result<Attempt>;
    async fn get_attempt_by_id(&self, id: i64) -> Result<Option<Attempt>>;
    async fn get_attempt_by_code(&self, code: &str) -> Result<Option<Attempt>>;
    async fn list_attempts_with_pagination(
        &self,
        query: AttemptListQuery,
    ) -> Result<AttemptListResponse>;
    async fn update_attempt(
        &self,
        id: i64,
        update: UpdateAttemptRequest,
    ) -> Result<Option<Attempt>>;
    async fn delete_attempt(&self, id: i64) -> Result<bool>;
    async fn count_attempts_by_evaluation(&self, evaluation_id: i64) -> Result<u64>;

    /// 答卷与作答方法
    // 返回 (答卷, 是否新建)
    async fn create_submission(
        &self,
        attempt_id: i64,
        student_id: i64,
        max_score: f64,
    ) -> Result<(Submission, bool)>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    async fn get_submission_by_attempt_and_student(
        &self,
        attempt_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 刷新最后活动时间
    async fn touch_submission(&self, id: i64) -> Result<bool>;
    async fn list_submission_summaries(&self, attempt_id: i64) -> Result<Vec<SubmissionSummary>>;
    async fn list_answers(&self, submission_id: i64) -> Result<Vec<Answer>>;
    async fn get_answer_by_id(&self, id: i64) -> Result<Option<Answer>>;
    // 新建或覆盖某题作答，答卷已提交时返回 None
    async fn upsert_answer(&self, answer: AnswerUpsert) -> Result<Option<Answer>>;
    // 写入判分结果并标记为已提交，答卷已提交时返回 None
    async fn finalize_submission(
        &self,
        submission_id: i64,
        grades: Vec<AnswerGrade>,
        max_score: f64,
    ) -> Result<Option<Submission>>;
    // 人工评分并重算答卷总分
    async fn grade_answer(
        &self,
        answer_id: i64,
        score: f64,
        is_correct: Option<bool>,
    ) -> Result<Option<(Answer, Submission)>>;

    /// 统计报表方法
    // author_id 为空时统计全站
    async fn overview_report(&self, author_id: Option<i64>) -> Result<OverviewReport>;
    async fn list_evaluation_submissions(&self, evaluation_id: i64) -> Result<Vec<Submission>>;
    // 已提交答卷中的全部作答
    async fn list_evaluation_answers(&self, evaluation_id: i64) -> Result<Vec<Answer>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
