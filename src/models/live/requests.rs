use super::entities::MessageLevel;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/live.ts")]
pub struct SendMessageRequest {
    pub recipient_id: Option<i64>,
    #[serde(default)]
    pub level: MessageLevel,
    pub content: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/live.ts")]
pub struct MessageListParams {
    pub since: Option<i64>,
    // 上次响应的 cursor，只返回序号更大的消息
    pub after: Option<u64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/live.ts")]
pub struct BlockUserRequest {
    pub user_id: i64,
    pub reason: Option<String>,
    // 封禁时长（秒），为空表示直到手动解除
    pub duration_secs: Option<i64>,
}
