use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::live::requests::{BlockUserRequest, MessageListParams, SendMessageRequest};
use crate::models::users::entities::UserRole;
use crate::services::LiveService;
use crate::utils::{SafeIDI64, SafeUserIdI64};

static LIVE_SERVICE: Lazy<LiveService> = Lazy::new(LiveService::new_lazy);

pub async fn get_panel(req: HttpRequest, attempt_id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIVE_SERVICE.get_panel(attempt_id.0, &req).await
}

pub async fn send_message(
    req: HttpRequest,
    attempt_id: SafeIDI64,
    body: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    LIVE_SERVICE
        .send_message(attempt_id.0, body.into_inner(), &req)
        .await
}

pub async fn list_messages(
    req: HttpRequest,
    attempt_id: SafeIDI64,
    query: web::Query<MessageListParams>,
) -> ActixResult<HttpResponse> {
    LIVE_SERVICE
        .list_messages(attempt_id.0, query.into_inner(), &req)
        .await
}

pub async fn block_user(
    req: HttpRequest,
    attempt_id: SafeIDI64,
    body: web::Json<BlockUserRequest>,
) -> ActixResult<HttpResponse> {
    LIVE_SERVICE
        .block_user(attempt_id.0, body.into_inner(), &req)
        .await
}

pub async fn unblock_user(
    req: HttpRequest,
    attempt_id: SafeIDI64,
    user_id: SafeUserIdI64,
) -> ActixResult<HttpResponse> {
    LIVE_SERVICE
        .unblock_user(attempt_id.0, user_id.0, &req)
        .await
}

pub async fn list_blocks(req: HttpRequest, attempt_id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIVE_SERVICE.list_blocks(attempt_id.0, &req).await
}

pub fn configure_live_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/live/attempts")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/{id}", web::get().to(get_panel))
                    .route("/{id}/messages", web::get().to(list_messages))
                    .route("/{id}/messages", web::post().to(send_message))
                    .route("/{id}/blocks", web::get().to(list_blocks))
                    .route("/{id}/blocks", web::post().to(block_user))
                    .route("/{id}/blocks/{user_id}", web::delete().to(unblock_user)),
            ),
    );
}
