use super::entities::QuestionType;
use crate::models::common::deserialize_some;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionOptionInput {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct CreateQuestionRequest {
    pub text: String,
    pub question_type: QuestionType,
    pub language: Option<String>,
    pub points: Option<f64>,
    pub position: Option<i32>,
    pub explanation: Option<String>,
    #[serde(default)]
    pub options: Vec<QuestionOptionInput>,
}

// 更新时提供 options 会整体替换原有选项
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct UpdateQuestionRequest {
    pub text: Option<String>,
    pub question_type: Option<QuestionType>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[ts(optional = nullable)]
    pub language: Option<Option<String>>,
    pub points: Option<f64>,
    pub position: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[ts(optional = nullable)]
    pub explanation: Option<Option<String>>,
    pub options: Option<Vec<QuestionOptionInput>>,
}

/// 校验通过、待写入存储层的题目
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    pub text: String,
    pub question_type: QuestionType,
    pub language: Option<String>,
    pub points: f64,
    pub position: Option<i32>,
    pub explanation: Option<String>,
    pub options: Vec<QuestionOptionInput>,
}
