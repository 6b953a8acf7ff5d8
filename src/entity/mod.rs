//! SeaORM 实体定义
//!
//! 这些实体只用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层读取后通过 `into_*` 转换为业务实体。

pub mod prelude;

pub mod answers;
pub mod areas;
pub mod attempts;
pub mod evaluations;
pub mod question_options;
pub mod questions;
pub mod submissions;
pub mod users;

use chrono::{DateTime, Utc};

/// 将数据库中的 UNIX 秒转换为 UTC 时间
pub(crate) fn ts_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
