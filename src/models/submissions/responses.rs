use super::entities::{Answer, Submission};
use crate::models::attempts::entities::Attempt;
use crate::models::live::entities::LiveMessage;
use crate::models::questions::entities::ExamQuestion;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct JoinExamResponse {
    pub submission: Submission,
    pub attempt: Attempt,
    pub evaluation_title: String,
    pub resumed: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct ExamDetailResponse {
    pub submission: Submission,
    pub attempt: Attempt,
    pub evaluation_title: String,
    pub questions: Vec<ExamQuestion>,
    pub answers: Vec<Answer>,
    pub remaining_seconds: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct AnswerResponse {
    pub answer: Answer,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitExamResponse {
    pub submission: Submission,
    pub graded_questions: i64,
    pub pending_questions: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct PollResponse {
    pub blocked: bool,
    pub block_reason: Option<String>,
    pub messages: Vec<LiveMessage>,
    pub cursor: u64,
    pub remaining_seconds: i64,
    pub server_time: i64,
    pub poll_interval_secs: u64,
}
