use super::entities::{UserRole, UserStatus};
use crate::models::common::{PaginationQuery, deserialize_some};
use serde::Deserialize;
use ts_rs::TS;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub area_id: Option<i64>,
    pub search: Option<String>,
}

// 用户创建请求（password 在进入存储层前替换为哈希）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub display_name: Option<String>,
    pub area_id: Option<i64>,
    pub evaluation_limit: Option<i32>,
}

// 用户更新请求；area_id / evaluation_limit 显式传 null 表示清空
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[ts(optional = nullable)]
    pub area_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[ts(optional = nullable)]
    pub evaluation_limit: Option<Option<i32>>,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub area_id: Option<i64>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_distinguishes_null() {
        let absent: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.area_id, None);

        let cleared: UpdateUserRequest = serde_json::from_str(r#"{"area_id":null}"#).unwrap();
        assert_eq!(cleared.area_id, Some(None));

        let set: UpdateUserRequest = serde_json::from_str(r#"{"area_id":3}"#).unwrap();
        assert_eq!(set.area_id, Some(Some(3)));
    }
}
