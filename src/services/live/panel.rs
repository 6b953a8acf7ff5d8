use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{LiveService, live_blocks};
use crate::models::{
    ApiResponse,
    live::responses::{LiveCounters, LivePanelResponse, LivePanelRow},
    submissions::entities::{SubmissionStatus, SubmissionSummary},
};
use crate::services::access::{current_user, internal_error, load_attempt};

/// 汇总答卷行与计数
pub fn build_rows(
    summaries: Vec<SubmissionSummary>,
    total_questions: i64,
    is_blocked: impl Fn(i64) -> bool,
) -> (LiveCounters, Vec<LivePanelRow>) {
    let mut counters = LiveCounters::default();
    let mut rows = Vec::with_capacity(summaries.len());

    for summary in summaries {
        let submission = summary.submission;
        let blocked = is_blocked(submission.student_id);

        counters.participants += 1;
        match submission.status {
            SubmissionStatus::InProgress => counters.in_progress += 1,
            SubmissionStatus::Submitted => counters.submitted += 1,
        }
        if blocked {
            counters.blocked += 1;
        }

        rows.push(LivePanelRow {
            submission_id: submission.id,
            student_id: submission.student_id,
            username: summary.student_username,
            display_name: summary.student_display_name,
            status: submission.status,
            answered: summary.answered_count,
            total_questions,
            last_activity_at: submission.last_activity_at,
            score: submission.score,
            max_score: submission.max_score,
            blocked,
        });
    }

    (counters, rows)
}

pub async fn get_panel(
    service: &LiveService,
    attempt_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    let (attempt, evaluation) = try_response!(load_attempt(&storage, &user, attempt_id).await);

    let summaries = match storage.list_submission_summaries(attempt_id).await {
        Ok(summaries) => summaries,
        Err(e) => return Ok(internal_error("Failed to list submissions", e)),
    };

    let now = chrono::Utc::now().timestamp();
    let blocks = live_blocks();
    let (mut counters, rows) = build_rows(summaries, evaluation.question_count, |student_id| {
        blocks.is_blocked(attempt_id, student_id, now)
    });
    // 尚未加入的学生也可能被预先封禁
    counters.blocked = counters
        .blocked
        .max(blocks.list(attempt_id, now).len() as i64);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        LivePanelResponse {
            remaining_seconds: attempt.remaining_seconds(now),
            attempt,
            evaluation_title: evaluation.title,
            counters,
            rows,
            server_time: now,
        },
        "Live panel retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::Submission;

    fn summary(id: i64, student_id: i64, status: SubmissionStatus) -> SubmissionSummary {
        let now = chrono::Utc::now();
        SubmissionSummary {
            submission: Submission {
                id,
                attempt_id: 1,
                student_id,
                status,
                score: None,
                max_score: 10.0,
                started_at: now,
                last_activity_at: now,
                submitted_at: None,
            },
            student_username: format!("student{student_id}"),
            student_display_name: None,
            answered_count: 2,
        }
    }

    #[test]
    fn test_build_rows_counts() {
        let summaries = vec![
            summary(1, 10, SubmissionStatus::InProgress),
            summary(2, 11, SubmissionStatus::Submitted),
            summary(3, 12, SubmissionStatus::InProgress),
        ];
        let (counters, rows) = build_rows(summaries, 5, |student| student == 12);

        assert_eq!(counters.participants, 3);
        assert_eq!(counters.in_progress, 2);
        assert_eq!(counters.submitted, 1);
        assert_eq!(counters.blocked, 1);
        assert_eq!(rows.len(), 3);
        assert!(rows[2].blocked);
        assert_eq!(rows[0].total_questions, 5);
        assert_eq!(rows[1].username, "student11");
    }
}
