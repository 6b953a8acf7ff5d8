//! 学生端考试流程：加入、作答、交卷、轮询

pub mod answer;
pub mod detail;
pub mod grading;
pub mod join;
pub mod poll;
pub mod rules;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    attempts::entities::Attempt,
    submissions::{
        entities::Submission,
        requests::{JoinExamRequest, PollParams, SaveAnswerRequest},
    },
    users::entities::User,
};
use crate::services::access::internal_error;
use crate::storage::Storage;

pub struct ExamService {
    storage: Option<Arc<dyn Storage>>,
}

impl ExamService {
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

    pub async fn join(&self, body: JoinExamRequest, request: &HttpRequest) -> ActixResult<HttpResponse> {
        join::join_exam(self, body, request).await
    }

    pub async fn get_detail(
        &self,
        submission_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::get_exam_detail(self, submission_id, request).await
    }

    pub async fn save_answer(
        &self,
        submission_id: i64,
        body: SaveAnswerRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        answer::save_answer(self, submission_id, body, request).await
    }

    pub async fn submit(&self, submission_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        submit::submit_exam(self, submission_id, request).await
    }

    pub async fn poll(
        &self,
        submission_id: i64,
        query: PollParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        poll::poll_exam(self, submission_id, query, request).await
    }
}

/// 加载当前学生自己的答卷及其场次，他人的答卷按不存在处理
pub(crate) async fn load_own_submission(
    storage: &Arc<dyn Storage>,
    user: &User,
    submission_id: i64,
) -> Result<(Submission, Attempt), HttpResponse> {
    let not_found = || {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        ))
    };

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) if submission.student_id == user.id => submission,
        Ok(_) => return Err(not_found()),
        Err(e) => return Err(internal_error("Failed to get submission", e)),
    };

    let attempt = match storage.get_attempt_by_id(submission.attempt_id).await {
        Ok(Some(attempt)) => attempt,
        Ok(None) => return Err(not_found()),
        Err(e) => return Err(internal_error("Failed to get attempt", e)),
    };

    Ok((submission, attempt))
}

pub(crate) fn already_submitted() -> HttpResponse {
    rules::ExamRefusal::AlreadySubmitted.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        attempts::requests::UpdateAttemptRequest,
        submissions::requests::AnswerUpsert,
        users::entities::UserRole,
    };
    use crate::services::live::live_blocks;
    use crate::services::test_support::{Fixture, status_and_code};

    fn answer(question_id: i64, option: i64) -> SaveAnswerRequest {
        SaveAnswerRequest {
            question_id,
            answer_text: None,
            selected_options: vec![option],
        }
    }

    #[actix_web::test]
    async fn test_join_refuses_blocked_student() {
        let fx = Fixture::new().await;
        let service = ExamService::new_lazy();
        let teacher = fx.user("proctor1", UserRole::Teacher, None).await;
        // 封禁表是进程级的，错开其他用例使用的学生 ID
        for i in 0..6 {
            fx.user(&format!("filler{i}"), UserRole::Student, None).await;
        }
        let student = fx.user("blocked1", UserRole::Student, None).await;
        let (evaluation, _) = fx.evaluation(&teacher, "Blocked").await;
        let attempt = fx.attempt(&evaluation, &teacher, -60, 3600).await;

        let now = chrono::Utc::now().timestamp();
        live_blocks().block(attempt.id, student.id, Some("phone".into()), teacher.id, None, now);

        let request = fx.request_as(&student);
        let response = service
            .join(JoinExamRequest { code: attempt.code.clone() }, &request)
            .await
            .unwrap();
        assert_eq!(
            status_and_code(response).await,
            (403, ErrorCode::StudentBlocked as i64)
        );

        live_blocks().unblock(attempt.id, student.id);
        let response = service
            .join(JoinExamRequest { code: attempt.code.clone() }, &request)
            .await
            .unwrap();
        assert_eq!(status_and_code(response).await.0, 200);
    }

    #[actix_web::test]
    async fn test_finished_submission_is_a_conflict() {
        let fx = Fixture::new().await;
        let service = ExamService::new_lazy();
        let teacher = fx.user("proctor2", UserRole::Teacher, None).await;
        let student = fx.user("finisher", UserRole::Student, None).await;
        let (evaluation, questions) = fx.evaluation(&teacher, "Finish").await;
        let attempt = fx.attempt(&evaluation, &teacher, -60, 3600).await;
        let request = fx.request_as(&student);

        let response = service
            .join(JoinExamRequest { code: attempt.code.clone() }, &request)
            .await
            .unwrap();
        assert_eq!(status_and_code(response).await.0, 200);
        let submission = fx
            .db
            .get_submission_by_attempt_and_student_impl(attempt.id, student.id)
            .await
            .unwrap()
            .unwrap();

        let question = &questions[0];
        let response = service
            .save_answer(submission.id, answer(question.id, question.options[1].id), &request)
            .await
            .unwrap();
        assert_eq!(status_and_code(response).await.0, 200);
        let response = service.submit(submission.id, &request).await.unwrap();
        assert_eq!(status_and_code(response).await.0, 200);

        let conflict = (409, ErrorCode::SubmissionAlreadySubmitted as i64);
        let response = service
            .join(JoinExamRequest { code: attempt.code.clone() }, &request)
            .await
            .unwrap();
        assert_eq!(status_and_code(response).await, conflict);
        let response = service
            .save_answer(submission.id, answer(question.id, question.options[0].id), &request)
            .await
            .unwrap();
        assert_eq!(status_and_code(response).await, conflict);
        let response = service.submit(submission.id, &request).await.unwrap();
        assert_eq!(status_and_code(response).await, conflict);

        let graded = fx.db.get_submission_by_id_impl(submission.id).await.unwrap().unwrap();
        assert_eq!(graded.score, Some(2.0));
    }

    #[actix_web::test]
    async fn test_closed_window_blocks_saving_but_not_submitting() {
        let fx = Fixture::new().await;
        let service = ExamService::new_lazy();
        let teacher = fx.user("proctor3", UserRole::Teacher, None).await;
        let student = fx.user("latecomer", UserRole::Student, None).await;
        let (evaluation, questions) = fx.evaluation(&teacher, "Closing").await;
        let attempt = fx.attempt(&evaluation, &teacher, -60, 3600).await;
        let (submission, _) = fx
            .db
            .create_submission_impl(attempt.id, student.id, 2.0)
            .await
            .unwrap();
        let question = &questions[0];
        fx.db
            .upsert_answer_impl(AnswerUpsert {
                submission_id: submission.id,
                question_id: question.id,
                answer_text: None,
                selected_options: vec![question.options[1].id],
            })
            .await
            .unwrap();

        fx.db
            .update_attempt_impl(
                attempt.id,
                UpdateAttemptRequest {
                    closed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let request = fx.request_as(&student);
        let response = service
            .save_answer(submission.id, answer(question.id, question.options[0].id), &request)
            .await
            .unwrap();
        assert_eq!(
            status_and_code(response).await,
            (403, ErrorCode::ExamWindowClosed as i64)
        );

        let response = service.submit(submission.id, &request).await.unwrap();
        assert_eq!(status_and_code(response).await.0, 200);
        let graded = fx.db.get_submission_by_id_impl(submission.id).await.unwrap().unwrap();
        assert_eq!(graded.score, Some(2.0));
    }

    #[actix_web::test]
    async fn test_other_students_submission_is_not_found() {
        let fx = Fixture::new().await;
        let service = ExamService::new_lazy();
        let teacher = fx.user("proctor4", UserRole::Teacher, None).await;
        let owner = fx.user("owner", UserRole::Student, None).await;
        let intruder = fx.user("intruder", UserRole::Student, None).await;
        let (evaluation, questions) = fx.evaluation(&teacher, "Private").await;
        let attempt = fx.attempt(&evaluation, &teacher, -60, 3600).await;
        let (submission, _) = fx
            .db
            .create_submission_impl(attempt.id, owner.id, 2.0)
            .await
            .unwrap();

        let request = fx.request_as(&intruder);
        let not_found = (404, ErrorCode::SubmissionNotFound as i64);
        let response = service.get_detail(submission.id, &request).await.unwrap();
        assert_eq!(status_and_code(response).await, not_found);
        let response = service
            .save_answer(submission.id, answer(questions[0].id, questions[0].options[1].id), &request)
            .await
            .unwrap();
        assert_eq!(status_and_code(response).await, not_found);
        let response = service.submit(submission.id, &request).await.unwrap();
        assert_eq!(status_and_code(response).await, not_found);
    }
}
