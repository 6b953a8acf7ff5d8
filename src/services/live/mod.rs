//! 实时监考
//!
//! 消息与封禁都保存在进程内存中，学生端通过轮询获取；
//! 后台任务按 `live.purge_interval_secs` 清理过期数据。

pub mod blocks;
pub mod bus;
pub mod messages;
pub mod panel;
pub mod restrictions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::live::requests::{BlockUserRequest, MessageListParams, SendMessageRequest};
use crate::storage::Storage;

pub use blocks::LiveUserBlocks;
pub use bus::{LiveMessageBus, MessageWindow};

/// 全局消息总线
static LIVE_BUS: Lazy<LiveMessageBus> =
    Lazy::new(|| LiveMessageBus::from_config(&AppConfig::get().live));

/// 全局封禁列表
static LIVE_BLOCKS: Lazy<LiveUserBlocks> = Lazy::new(LiveUserBlocks::new);

pub fn live_bus() -> &'static LiveMessageBus {
    &LIVE_BUS
}

pub fn live_blocks() -> &'static LiveUserBlocks {
    &LIVE_BLOCKS
}

/// 清理过期消息与封禁，返回 (消息数, 封禁数)
pub fn purge_expired(now: i64) -> (usize, usize) {
    (
        live_bus().purge_expired(now),
        live_blocks().purge_expired(now),
    )
}

/// 场次删除后清掉它的实时数据
pub fn clear_attempt(attempt_id: i64) {
    live_bus().clear_attempt(attempt_id);
    live_blocks().clear_attempt(attempt_id);
}

pub struct LiveService {
    storage: Option<Arc<dyn Storage>>,
}

impl LiveService {
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

    pub async fn get_panel(
        &self,
        attempt_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        panel::get_panel(self, attempt_id, request).await
    }

    pub async fn send_message(
        &self,
        attempt_id: i64,
        body: SendMessageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        messages::send_message(self, attempt_id, body, request).await
    }

    pub async fn list_messages(
        &self,
        attempt_id: i64,
        query: MessageListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        messages::list_messages(self, attempt_id, query, request).await
    }

    pub async fn block_user(
        &self,
        attempt_id: i64,
        body: BlockUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        restrictions::block_user(self, attempt_id, body, request).await
    }

    pub async fn unblock_user(
        &self,
        attempt_id: i64,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        restrictions::unblock_user(self, attempt_id, user_id, request).await
    }

    pub async fn list_blocks(
        &self,
        attempt_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        restrictions::list_blocks(self, attempt_id, request).await
    }
}
