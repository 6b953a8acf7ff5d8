use super::entities::RepositoryReport;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analyzer.ts")]
pub struct RepositoryReportResponse {
    pub report: RepositoryReport,
    pub cached: bool,
}
