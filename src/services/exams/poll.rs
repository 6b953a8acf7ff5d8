use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::{ExamService, load_own_submission};
use crate::config::AppConfig;
use crate::models::{
    ApiResponse,
    submissions::{
        entities::SubmissionStatus, requests::PollParams, responses::PollResponse,
    },
};
use crate::services::access::current_user;
use crate::services::live::{MessageWindow, live_blocks, live_bus};

pub async fn poll_exam(
    service: &ExamService,
    submission_id: i64,
    query: PollParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    let (submission, attempt) =
        try_response!(load_own_submission(&storage, &user, submission_id).await);

    if submission.status == SubmissionStatus::InProgress
        && let Err(e) = storage.touch_submission(submission.id).await
    {
        warn!("Failed to refresh activity of submission {}: {}", submission.id, e);
    }

    let now = chrono::Utc::now().timestamp();
    let block = live_blocks().active_block(attempt.id, user.id, now);
    let (messages, cursor) = live_bus().messages_for_user(
        attempt.id,
        user.id,
        MessageWindow::new(query.since, query.after),
        now,
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PollResponse {
            blocked: block.is_some(),
            block_reason: block.and_then(|b| b.reason),
            messages,
            cursor,
            remaining_seconds: attempt.remaining_seconds(now),
            server_time: now,
            poll_interval_secs: AppConfig::get().live.poll_interval_secs,
        },
        "Poll successful",
    )))
}
