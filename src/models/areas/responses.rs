use super::entities::Area;
use crate::models::common::PaginationInfo;
use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/area.ts")]
pub struct AreaResponse {
    pub area: Area,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/area.ts")]
pub struct AreaListResponse {
    pub items: Vec<Area>,
    pub pagination: PaginationInfo,
}

// 领域下的教师
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/area.ts")]
pub struct AreaTeachersResponse {
    pub area: Area,
    pub teachers: Vec<User>,
}
