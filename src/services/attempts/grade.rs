use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttemptService;
use crate::models::{
    ApiResponse, ErrorCode,
    attempts::{requests::GradeAnswerRequest, responses::GradeAnswerResponse},
    submissions::entities::SubmissionStatus,
};
use crate::services::access::{current_user, internal_error, load_attempt};

/// 校验人工给分，未指定对错时按是否满分推断
pub fn resolve_grade(
    score: f64,
    is_correct: Option<bool>,
    points: f64,
) -> Result<Option<bool>, String> {
    if !score.is_finite() || score < 0.0 {
        return Err("Score must be zero or greater".to_string());
    }
    if score > points {
        return Err(format!("Score cannot exceed the question's {points} points"));
    }
    Ok(is_correct.or(Some(score >= points)))
}

pub async fn grade_answer(
    service: &AttemptService,
    answer_id: i64,
    body: GradeAnswerRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);

    let answer_not_found = || {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AnswerNotFound,
            "Answer not found",
        ))
    };

    let answer = match storage.get_answer_by_id(answer_id).await {
        Ok(Some(answer)) => answer,
        Ok(None) => return Ok(answer_not_found()),
        Err(e) => return Ok(internal_error("Failed to get answer", e)),
    };
    let submission = match storage.get_submission_by_id(answer.submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => return Ok(answer_not_found()),
        Err(e) => return Ok(internal_error("Failed to get submission", e)),
    };
    try_response!(load_attempt(&storage, &user, submission.attempt_id).await);

    // 交卷时会重写判分结果，只允许给已提交的答卷评分
    if submission.status != SubmissionStatus::Submitted {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "Submission has not been submitted yet",
        )));
    }

    let question = match storage.get_question_by_id(answer.question_id).await {
        Ok(Some(question)) => question,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::QuestionNotFound,
                "Question not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get question", e)),
    };

    let is_correct = match resolve_grade(body.score, body.is_correct, question.points) {
        Ok(is_correct) => is_correct,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };

    let (answer, submission) = match storage
        .grade_answer(answer_id, body.score, is_correct)
        .await
    {
        Ok(Some(result)) => result,
        Ok(None) => return Ok(answer_not_found()),
        Err(e) => return Ok(internal_error("Failed to grade answer", e)),
    };

    let pending_answers = match storage.list_answers(submission.id).await {
        Ok(answers) => answers.iter().filter(|a| a.score.is_none()).count() as i64,
        Err(e) => return Ok(internal_error("Failed to list answers", e)),
    };

    info!(
        "Answer {} graded {} by user {}, submission {} now {:?}",
        answer.id, body.score, user.id, submission.id, submission.score
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GradeAnswerResponse {
            answer,
            submission_score: submission.score,
            pending_answers,
        },
        "Answer graded successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_grade() {
        assert_eq!(resolve_grade(5.0, None, 5.0), Ok(Some(true)));
        assert_eq!(resolve_grade(2.5, None, 5.0), Ok(Some(false)));
        assert_eq!(resolve_grade(2.5, Some(true), 5.0), Ok(Some(true)));
        assert!(resolve_grade(-1.0, None, 5.0).is_err());
        assert!(resolve_grade(5.5, None, 5.0).is_err());
        assert!(resolve_grade(f64::NAN, None, 5.0).is_err());
    }
}
