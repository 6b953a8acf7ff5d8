use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 消息级别
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/live.ts")]
pub enum MessageLevel {
    #[default]
    Info,
    Warning,
    Alert,
}

// 实时消息（时间为 UNIX 秒，seq 在进程内严格递增）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/live.ts")]
pub struct LiveMessage {
    pub id: String,
    pub seq: u64,
    pub attempt_id: i64,
    pub sender_id: i64,
    // 为空表示广播
    pub recipient_id: Option<i64>,
    pub level: MessageLevel,
    pub content: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl LiveMessage {
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

// 学生封禁记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/live.ts")]
pub struct UserBlock {
    pub attempt_id: i64,
    pub user_id: i64,
    pub reason: Option<String>,
    pub blocked_by: i64,
    pub created_at: i64,
    // 为空表示无限期
    pub expires_at: Option<i64>,
}

impl UserBlock {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}
