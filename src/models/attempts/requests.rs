use super::entities::AttemptStatus;
use crate::models::common::{PaginationQuery, deserialize_some};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct AttemptListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub evaluation_id: Option<i64>,
    pub status: Option<AttemptStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct AttemptListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub evaluation_id: Option<i64>,
    // 教师只能看到自己测评下的场次
    pub author_id: Option<i64>,
    pub status: Option<AttemptStatus>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct CreateAttemptRequest {
    pub evaluation_id: i64,
    pub title: Option<String>,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
}

/// 写入存储层的新场次（访问码由存储层生成）
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub evaluation_id: i64,
    pub created_by: i64,
    pub title: Option<String>,
    pub start_time: i64,
    pub end_time: i64,
    pub code_length: usize,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct UpdateAttemptRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[ts(optional = nullable)]
    pub title: Option<Option<String>>,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    pub closed: Option<bool>,
}

// 人工评分
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct GradeAnswerRequest {
    pub score: f64,
    pub is_correct: Option<bool>,
}
