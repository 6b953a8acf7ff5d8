pub mod create;
pub mod delete;
pub mod list;
pub mod update;
pub mod validation;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::questions::requests::{CreateQuestionRequest, UpdateQuestionRequest};
use crate::storage::Storage;

pub struct QuestionService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuestionService {
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

    pub async fn list_questions(
        &self,
        evaluation_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_questions(self, evaluation_id, request).await
    }

    pub async fn create_question(
        &self,
        evaluation_id: i64,
        body: CreateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_question(self, evaluation_id, body, request).await
    }

    pub async fn update_question(
        &self,
        question_id: i64,
        update: UpdateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_question(self, question_id, update, request).await
    }

    pub async fn delete_question(
        &self,
        question_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_question(self, question_id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ErrorCode, questions::requests::QuestionOptionInput,
        submissions::requests::AnswerUpsert, users::entities::UserRole,
    };
    use crate::services::test_support::{Fixture, status_and_code};

    #[actix_web::test]
    async fn test_answered_question_keeps_its_shape() {
        let fx = Fixture::new().await;
        let service = QuestionService::new_lazy();
        let teacher = fx.user("editor", UserRole::Teacher, None).await;
        let student = fx.user("answerer", UserRole::Student, None).await;
        let (evaluation, questions) = fx.evaluation(&teacher, "Editing").await;
        let attempt = fx.attempt(&evaluation, &teacher, -60, 3600).await;
        let question = &questions[0];
        let (submission, _) = fx
            .db
            .create_submission_impl(attempt.id, student.id, 2.0)
            .await
            .unwrap();
        fx.db
            .upsert_answer_impl(AnswerUpsert {
                submission_id: submission.id,
                question_id: question.id,
                answer_text: None,
                selected_options: vec![question.options[1].id],
            })
            .await
            .unwrap();

        let request = fx.request_as(&teacher);
        let three_options = UpdateQuestionRequest {
            options: Some(
                (0..3)
                    .map(|i| QuestionOptionInput {
                        text: format!("choice {i}"),
                        is_correct: i == 1,
                    })
                    .collect(),
            ),
            ..Default::default()
        };
        let response = service
            .update_question(question.id, three_options, &request)
            .await
            .unwrap();
        assert_eq!(
            status_and_code(response).await,
            (409, ErrorCode::QuestionHasAnswers as i64)
        );

        let reworded = UpdateQuestionRequest {
            text: Some("Pick the second one".into()),
            ..Default::default()
        };
        let response = service
            .update_question(question.id, reworded, &request)
            .await
            .unwrap();
        assert_eq!(status_and_code(response).await.0, 200);

        let stored = fx.db.get_question_by_id_impl(question.id).await.unwrap().unwrap();
        let ids: Vec<i64> = stored.options.iter().map(|o| o.id).collect();
        assert_eq!(ids, question.options.iter().map(|o| o.id).collect::<Vec<_>>());
    }
}
