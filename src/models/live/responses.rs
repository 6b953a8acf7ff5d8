use super::entities::{LiveMessage, UserBlock};
use crate::models::attempts::entities::Attempt;
use crate::models::submissions::entities::SubmissionStatus;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/live.ts")]
pub struct LiveCounters {
    pub participants: i64,
    pub in_progress: i64,
    pub submitted: i64,
    pub blocked: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/live.ts")]
pub struct LivePanelRow {
    pub submission_id: i64,
    pub student_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub status: SubmissionStatus,
    pub answered: i64,
    pub total_questions: i64,
    pub last_activity_at: chrono::DateTime<chrono::Utc>,
    pub score: Option<f64>,
    pub max_score: f64,
    pub blocked: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/live.ts")]
pub struct LivePanelResponse {
    pub attempt: Attempt,
    pub evaluation_title: String,
    pub remaining_seconds: i64,
    pub counters: LiveCounters,
    pub rows: Vec<LivePanelRow>,
    pub server_time: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/live.ts")]
pub struct LiveMessageResponse {
    pub message: LiveMessage,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/live.ts")]
pub struct LiveMessageListResponse {
    pub items: Vec<LiveMessage>,
    pub cursor: u64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/live.ts")]
pub struct UserBlockResponse {
    pub block: UserBlock,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/live.ts")]
pub struct UserBlockListResponse {
    pub items: Vec<UserBlock>,
}
