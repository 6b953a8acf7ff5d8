use crate::models::common::ExportFormat;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analyzer.ts")]
pub struct AnalyzeRepositoryRequest {
    // owner/repo、https 或 ssh 地址
    pub repository: String,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analyzer.ts")]
pub struct ExportRepositoryRequest {
    pub repository: String,
    pub format: Option<ExportFormat>,
}
