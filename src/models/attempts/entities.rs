use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 场次状态（由时间窗口和关闭标记推导，不落库）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub enum AttemptStatus {
    Scheduled,
    Active,
    Finished,
}

impl AttemptStatus {
    /// 根据 UNIX 秒计算状态
    pub fn at(start: i64, end: i64, closed: bool, now: i64) -> Self {
        if closed || now >= end {
            AttemptStatus::Finished
        } else if now < start {
            AttemptStatus::Scheduled
        } else {
            AttemptStatus::Active
        }
    }
}

impl std::fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptStatus::Scheduled => write!(f, "scheduled"),
            AttemptStatus::Active => write!(f, "active"),
            AttemptStatus::Finished => write!(f, "finished"),
        }
    }
}

// 考试场次
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct Attempt {
    pub id: i64,
    pub evaluation_id: i64,
    pub created_by: i64,
    pub title: Option<String>,
    pub code: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub closed: bool,
    pub status: AttemptStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Attempt {
    /// 按当前时间重新计算状态
    pub fn status_now(&self) -> AttemptStatus {
        AttemptStatus::at(
            self.start_time.timestamp(),
            self.end_time.timestamp(),
            self.closed,
            chrono::Utc::now().timestamp(),
        )
    }

    /// 距离结束的剩余秒数，已结束为 0
    pub fn remaining_seconds(&self, now: i64) -> i64 {
        if self.closed {
            return 0;
        }
        (self.end_time.timestamp() - now).max(0)
    }

    /// 场次展示名
    pub fn display_title(&self, evaluation_title: &str) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("{evaluation_title} ({})", self.code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert_eq!(AttemptStatus::at(100, 200, false, 50), AttemptStatus::Scheduled);
        assert_eq!(AttemptStatus::at(100, 200, false, 100), AttemptStatus::Active);
        assert_eq!(AttemptStatus::at(100, 200, false, 199), AttemptStatus::Active);
        assert_eq!(AttemptStatus::at(100, 200, false, 200), AttemptStatus::Finished);
        assert_eq!(AttemptStatus::at(100, 200, true, 150), AttemptStatus::Finished);
        assert_eq!(AttemptStatus::at(100, 200, true, 50), AttemptStatus::Finished);
    }
}
