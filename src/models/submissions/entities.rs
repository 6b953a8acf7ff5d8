use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    InProgress,
    Submitted,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::InProgress => write!(f, "in_progress"),
            SubmissionStatus::Submitted => write!(f, "submitted"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(SubmissionStatus::InProgress),
            "submitted" => Ok(SubmissionStatus::Submitted),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 学生在某场次中的答卷
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub attempt_id: i64,
    pub student_id: i64,
    pub status: SubmissionStatus,
    pub score: Option<f64>,
    pub max_score: f64,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub last_activity_at: chrono::DateTime<chrono::Utc>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Submission {
    /// 得分百分比（0..=100），未评分或满分为 0 时返回 None
    pub fn percentage(&self) -> Option<f64> {
        match self.score {
            Some(score) if self.max_score > 0.0 => Some(score / self.max_score * 100.0),
            _ => None,
        }
    }
}

// 单题作答
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Answer {
    pub id: i64,
    pub submission_id: i64,
    pub question_id: i64,
    pub answer_text: Option<String>,
    pub selected_options: Vec<i64>,
    pub is_correct: Option<bool>,
    pub score: Option<f64>,
    pub answered_at: chrono::DateTime<chrono::Utc>,
}

// 答卷概要（含学生信息与作答数量）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionSummary {
    pub submission: Submission,
    pub student_username: String,
    pub student_display_name: Option<String>,
    pub answered_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let now = chrono::Utc::now();
        let mut submission = Submission {
            id: 1,
            attempt_id: 1,
            student_id: 1,
            status: SubmissionStatus::Submitted,
            score: Some(7.5),
            max_score: 10.0,
            started_at: now,
            last_activity_at: now,
            submitted_at: Some(now),
        };
        assert_eq!(submission.percentage(), Some(75.0));

        submission.max_score = 0.0;
        assert_eq!(submission.percentage(), None);
    }
}
