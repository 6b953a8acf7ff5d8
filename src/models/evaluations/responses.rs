use super::entities::{Evaluation, EvaluationDetail};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationResponse {
    pub evaluation: Evaluation,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationListResponse {
    pub items: Vec<Evaluation>,
    pub pagination: PaginationInfo,
}

// JSON 导出文件内容
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationExport {
    #[serde(flatten)]
    #[ts(flatten)]
    pub detail: EvaluationDetail,
    pub max_score: f64,
    pub exported_at: chrono::DateTime<chrono::Utc>,
}
