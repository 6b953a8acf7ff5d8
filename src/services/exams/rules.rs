//! 答题流程的准入规则
//!
//! 加入、作答、交卷各自的前置条件集中在这里，处理器只负责取数和写库。

use actix_web::HttpResponse;

use crate::models::{
    ApiResponse, ErrorCode,
    attempts::entities::AttemptStatus,
    live::entities::UserBlock,
    submissions::entities::{Submission, SubmissionStatus},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ExamRefusal {
    AlreadySubmitted,
    NotActive(AttemptStatus),
    WindowClosed,
    Blocked(Option<String>),
}

impl ExamRefusal {
    pub fn into_response(self) -> HttpResponse {
        match self {
            ExamRefusal::AlreadySubmitted => HttpResponse::Conflict().json(
                ApiResponse::error_empty(
                    ErrorCode::SubmissionAlreadySubmitted,
                    "Submission has already been submitted",
                ),
            ),
            ExamRefusal::NotActive(status) => HttpResponse::Forbidden().json(
                ApiResponse::error_empty(
                    ErrorCode::AttemptNotActive,
                    format!("Attempt is not active ({status})"),
                ),
            ),
            ExamRefusal::WindowClosed => HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ExamWindowClosed,
                "The exam window has closed",
            )),
            ExamRefusal::Blocked(reason) => {
                let message = match reason {
                    Some(reason) => format!("You have been blocked from this exam: {reason}"),
                    None => "You have been blocked from this exam".to_string(),
                };
                HttpResponse::Forbidden()
                    .json(ApiResponse::error_empty(ErrorCode::StudentBlocked, message))
            }
        }
    }
}

fn ensure_in_progress(submission: &Submission) -> Result<(), ExamRefusal> {
    if submission.status == SubmissionStatus::InProgress {
        Ok(())
    } else {
        Err(ExamRefusal::AlreadySubmitted)
    }
}

/// 加入：已交卷优先报 409，其次场次必须进行中，最后检查封禁
pub fn check_join(
    existing: Option<&Submission>,
    status: AttemptStatus,
    block: Option<UserBlock>,
) -> Result<(), ExamRefusal> {
    if let Some(submission) = existing {
        ensure_in_progress(submission)?;
    }
    if status != AttemptStatus::Active {
        return Err(ExamRefusal::NotActive(status));
    }
    match block {
        Some(block) => Err(ExamRefusal::Blocked(block.reason)),
        None => Ok(()),
    }
}

/// 保存作答：答卷进行中、窗口未关闭、未被封禁
pub fn check_answer(
    submission: &Submission,
    status: AttemptStatus,
    block: Option<UserBlock>,
) -> Result<(), ExamRefusal> {
    ensure_in_progress(submission)?;
    if status != AttemptStatus::Active {
        return Err(ExamRefusal::WindowClosed);
    }
    match block {
        Some(block) => Err(ExamRefusal::Blocked(block.reason)),
        None => Ok(()),
    }
}

/// 交卷只要求答卷进行中；窗口关闭或被封禁后仍可提交已作答内容
pub fn check_submit(submission: &Submission) -> Result<(), ExamRefusal> {
    ensure_in_progress(submission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    fn submission(status: SubmissionStatus) -> Submission {
        let now = chrono::Utc::now();
        Submission {
            id: 1,
            attempt_id: 1,
            student_id: 2,
            status,
            score: None,
            max_score: 4.0,
            started_at: now,
            last_activity_at: now,
            submitted_at: None,
        }
    }

    fn block(reason: &str) -> UserBlock {
        UserBlock {
            attempt_id: 1,
            user_id: 2,
            reason: Some(reason.to_string()),
            blocked_by: 9,
            created_at: 100,
            expires_at: None,
        }
    }

    #[test]
    fn test_join_rules() {
        assert_eq!(check_join(None, AttemptStatus::Active, None), Ok(()));
        assert_eq!(
            check_join(None, AttemptStatus::Active, Some(block("phone"))),
            Err(ExamRefusal::Blocked(Some("phone".to_string())))
        );
        assert_eq!(
            check_join(None, AttemptStatus::Scheduled, None),
            Err(ExamRefusal::NotActive(AttemptStatus::Scheduled))
        );

        // 已交卷的学生即使场次已结束也得到 409
        let done = submission(SubmissionStatus::Submitted);
        assert_eq!(
            check_join(Some(&done), AttemptStatus::Finished, Some(block("x"))),
            Err(ExamRefusal::AlreadySubmitted)
        );

        let resumed = submission(SubmissionStatus::InProgress);
        assert_eq!(check_join(Some(&resumed), AttemptStatus::Active, None), Ok(()));
    }

    #[test]
    fn test_answer_rules() {
        let open = submission(SubmissionStatus::InProgress);
        assert_eq!(check_answer(&open, AttemptStatus::Active, None), Ok(()));
        assert_eq!(
            check_answer(&open, AttemptStatus::Finished, None),
            Err(ExamRefusal::WindowClosed)
        );
        assert_eq!(
            check_answer(&open, AttemptStatus::Active, Some(block("talking"))),
            Err(ExamRefusal::Blocked(Some("talking".to_string())))
        );
        assert_eq!(
            check_answer(&submission(SubmissionStatus::Submitted), AttemptStatus::Active, None),
            Err(ExamRefusal::AlreadySubmitted)
        );
    }

    #[test]
    fn test_submit_rules() {
        assert_eq!(check_submit(&submission(SubmissionStatus::InProgress)), Ok(()));
        assert_eq!(
            check_submit(&submission(SubmissionStatus::Submitted)),
            Err(ExamRefusal::AlreadySubmitted)
        );
    }

    #[test]
    fn test_refusal_status_codes() {
        assert_eq!(
            ExamRefusal::AlreadySubmitted.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ExamRefusal::Blocked(None).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ExamRefusal::WindowClosed.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
