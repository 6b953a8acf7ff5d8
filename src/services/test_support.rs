//! 处理器测试共用的内存数据库与请求构造

use actix_web::{HttpMessage, HttpRequest, HttpResponse, test::TestRequest, web};
use std::sync::Arc;

use crate::models::{
    areas::requests::CreateAreaRequest,
    attempts::{entities::Attempt, requests::NewAttempt},
    evaluations::entities::Evaluation,
    questions::{
        entities::{Question, QuestionType},
        requests::{QuestionDraft, QuestionOptionInput},
    },
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};

pub(crate) struct Fixture {
    pub db: Arc<SeaOrmStorage>,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = SeaOrmStorage::connect("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory database");
        Self { db: Arc::new(db) }
    }

    /// 以指定用户身份构造请求，等同于 RequireJWT 放行后的状态
    pub fn request_as(&self, user: &User) -> HttpRequest {
        let storage: Arc<dyn Storage> = self.db.clone();
        let request = TestRequest::default()
            .app_data(web::Data::new(storage))
            .to_http_request();
        request.extensions_mut().insert(user.clone());
        request
    }

    pub async fn user(&self, username: &str, role: UserRole, area_id: Option<i64>) -> User {
        self.db
            .create_user_impl(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "hash".to_string(),
                role,
                display_name: None,
                area_id,
                evaluation_limit: None,
            })
            .await
            .unwrap()
    }

    pub async fn area(&self, name: &str) -> i64 {
        self.db
            .create_area_impl(CreateAreaRequest {
                name: name.to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    /// 一道单选题（第二项正确）的测评
    pub async fn evaluation(&self, author: &User, title: &str) -> (Evaluation, Vec<Question>) {
        let evaluation = self
            .db
            .create_evaluation_impl(title.to_string(), None, author.id)
            .await
            .unwrap();
        let questions = self
            .db
            .create_questions_impl(
                evaluation.id,
                vec![QuestionDraft {
                    text: "Pick the second".to_string(),
                    question_type: QuestionType::SingleChoice,
                    language: None,
                    points: 2.0,
                    position: None,
                    explanation: None,
                    options: (0..2)
                        .map(|i| QuestionOptionInput {
                            text: format!("option {i}"),
                            is_correct: i == 1,
                        })
                        .collect(),
                }],
            )
            .await
            .unwrap();
        (evaluation, questions)
    }

    /// 相对当前时间的窗口创建场次
    pub async fn attempt(
        &self,
        evaluation: &Evaluation,
        author: &User,
        start_offset: i64,
        end_offset: i64,
    ) -> Attempt {
        let now = chrono::Utc::now().timestamp();
        self.db
            .create_attempt_impl(NewAttempt {
                evaluation_id: evaluation.id,
                created_by: author.id,
                title: None,
                start_time: now + start_offset,
                end_time: now + end_offset,
                code_length: 6,
            })
            .await
            .unwrap()
    }
}

/// 响应的 HTTP 状态与业务码
pub(crate) async fn status_and_code(response: HttpResponse) -> (u16, i64) {
    let status = response.status().as_u16();
    let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json["code"].as_i64().unwrap_or_default())
}
