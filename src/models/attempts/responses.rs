use super::entities::Attempt;
use crate::models::common::PaginationInfo;
use crate::models::submissions::entities::{Answer, SubmissionSummary};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct AttemptResponse {
    pub attempt: Attempt,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct AttemptListResponse {
    pub items: Vec<Attempt>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct AttemptSubmissionsResponse {
    pub attempt: Attempt,
    pub total_questions: i64,
    pub items: Vec<SubmissionSummary>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct GradeAnswerResponse {
    pub answer: Answer,
    pub submission_score: Option<f64>,
    pub pending_answers: i64,
}

// JSON 导出文件内容
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct AttemptExport {
    pub attempt: Attempt,
    pub evaluation_title: String,
    pub total_questions: i64,
    pub results: Vec<SubmissionSummary>,
    pub exported_at: chrono::DateTime<chrono::Utc>,
}
