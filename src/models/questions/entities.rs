use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 题型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    TrueFalse,
    Open,
    Code,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        QuestionType::SingleChoice,
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::Open,
        QuestionType::Code,
    ];

    /// 是否为选择类题型（自动判分）
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            QuestionType::SingleChoice | QuestionType::MultipleChoice | QuestionType::TrueFalse
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::Open => "open",
            QuestionType::Code => "code",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        QuestionType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("Invalid question type: {s}"))
    }
}

// 选项
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionOption {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
    pub position: i32,
}

// 题目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct Question {
    pub id: i64,
    pub evaluation_id: i64,
    pub text: String,
    pub question_type: QuestionType,
    pub language: Option<String>,
    pub points: f64,
    pub position: i32,
    pub explanation: Option<String>,
    pub options: Vec<QuestionOption>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Question {
    pub fn correct_option_ids(&self) -> Vec<i64> {
        self.options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id)
            .collect()
    }

    /// 学生视角：隐藏正确答案和解析
    pub fn into_exam_question(self) -> ExamQuestion {
        ExamQuestion {
            id: self.id,
            text: self.text,
            question_type: self.question_type,
            language: self.language,
            points: self.points,
            position: self.position,
            options: self
                .options
                .into_iter()
                .map(|o| ExamOption {
                    id: o.id,
                    text: o.text,
                    position: o.position,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct ExamOption {
    pub id: i64,
    pub text: String,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct ExamQuestion {
    pub id: i64,
    pub text: String,
    pub question_type: QuestionType,
    pub language: Option<String>,
    pub points: f64,
    pub position: i32,
    pub options: Vec<ExamOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_parse() {
        assert_eq!(
            "single_choice".parse::<QuestionType>().unwrap(),
            QuestionType::SingleChoice
        );
        assert_eq!(
            "Multiple-Choice".parse::<QuestionType>().unwrap(),
            QuestionType::MultipleChoice
        );
        assert_eq!(
            "true false".parse::<QuestionType>().unwrap(),
            QuestionType::TrueFalse
        );
        assert!("essay".parse::<QuestionType>().is_err());
    }

    #[test]
    fn test_choice_types() {
        assert!(QuestionType::TrueFalse.is_choice());
        assert!(!QuestionType::Code.is_choice());
        assert!(!QuestionType::Open.is_choice());
    }
}
