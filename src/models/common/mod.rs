pub mod export;
pub mod pagination;
pub mod response;

pub use export::{ExportFormat, ExportQuery};
pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;

use serde::{Deserialize, Deserializer};

/// 区分“未提供”和“显式为 null”的可选字段
///
/// 搭配 `#[serde(default, deserialize_with = "deserialize_some")]` 与 `Option<Option<T>>` 使用。
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
