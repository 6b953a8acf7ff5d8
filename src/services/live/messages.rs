use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{LiveService, MessageWindow, live_bus};
use crate::models::{
    ApiResponse, ErrorCode,
    live::{
        requests::{MessageListParams, SendMessageRequest},
        responses::{LiveMessageListResponse, LiveMessageResponse},
    },
};
use crate::services::access::{current_user, internal_error, load_attempt};

pub async fn send_message(
    service: &LiveService,
    attempt_id: i64,
    body: SendMessageRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    try_response!(load_attempt(&storage, &user, attempt_id).await);

    if let Some(recipient_id) = body.recipient_id {
        match storage.get_user_by_id(recipient_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::UserNotFound,
                    "Recipient not found",
                )));
            }
            Err(e) => return Ok(internal_error("Failed to get recipient", e)),
        }
    }

    let now = chrono::Utc::now().timestamp();
    match live_bus().publish(
        attempt_id,
        user.id,
        body.recipient_id,
        body.level,
        &body.content,
        now,
    ) {
        Ok(message) => {
            info!(
                "Live message {} sent to attempt {} by user {}",
                message.id, attempt_id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                LiveMessageResponse { message },
                "Message sent successfully",
            )))
        }
        Err(msg) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::LiveMessageInvalid, msg))),
    }
}

pub async fn list_messages(
    service: &LiveService,
    attempt_id: i64,
    query: MessageListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    try_response!(load_attempt(&storage, &user, attempt_id).await);

    let now = chrono::Utc::now().timestamp();
    let (items, cursor) = live_bus().messages_for_attempt(
        attempt_id,
        MessageWindow::new(query.since, query.after),
        now,
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        LiveMessageListResponse { items, cursor },
        "Messages retrieved successfully",
    )))
}
