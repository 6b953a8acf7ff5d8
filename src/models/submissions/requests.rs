use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct JoinExamRequest {
    pub code: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SaveAnswerRequest {
    pub question_id: i64,
    pub answer_text: Option<String>,
    #[serde(default)]
    pub selected_options: Vec<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct PollParams {
    // UNIX 秒，只返回该时间之后的消息
    pub since: Option<i64>,
    // 上次响应的 cursor，同一秒内发布的消息也不会遗漏
    pub after: Option<u64>,
}

/// 写入存储层的作答
#[derive(Debug, Clone)]
pub struct AnswerUpsert {
    pub submission_id: i64,
    pub question_id: i64,
    pub answer_text: Option<String>,
    pub selected_options: Vec<i64>,
}

/// 提交时写入的单题判分结果
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerGrade {
    pub question_id: i64,
    pub is_correct: Option<bool>,
    pub score: Option<f64>,
}
